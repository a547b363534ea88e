//! # Autoscaler form
//!
//! Controller behind the "Autoscale" page of the console: it validates the
//! route, loads the workload or autoscaler being edited, checks permissions and
//! submits a create or update of a `HorizontalPodAutoscaler`.
//!
//! Collaborators (projects, authorization, data access, metrics, navigation)
//! are traits in [`services`], with REST implementations in [`client`].

pub mod breadcrumbs;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod hpa;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_setup {
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
}
