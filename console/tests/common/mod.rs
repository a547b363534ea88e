#![allow(dead_code)]

pub mod test_cluster;
pub mod utils;

use std::sync::Once;
static INIT: Once = Once::new();

#[ctor::ctor]
fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
