//! Breadcrumb trail shown above the form.

use shared::models::Project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub title: String,
    pub link: Option<String>,
}

/// Where the page sits: the object it belongs to and the subpage showing.
#[derive(Debug, Clone)]
pub struct NavigationContext<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub project: &'a Project,
    pub subpage: Option<&'a str>,
    pub include_project: bool,
}

/// Project, object list, object, then the subpage (unlinked).
pub fn breadcrumbs(ctx: &NavigationContext<'_>) -> Vec<Breadcrumb> {
    let namespace = &ctx.project.metadata.name;
    let browse = format!("project/{}/browse/{}", namespace, browse_segment(ctx.kind));
    let mut trail = Vec::new();

    if ctx.include_project {
        trail.push(Breadcrumb {
            title: ctx.project.display_name().to_string(),
            link: Some(format!("project/{}/overview", namespace)),
        });
    }

    trail.push(Breadcrumb {
        title: format!("{}s", humanize_kind(ctx.kind)),
        link: Some(browse.clone()),
    });

    match ctx.subpage {
        Some(subpage) => {
            trail.push(Breadcrumb {
                title: ctx.name.to_string(),
                link: Some(format!("{}/{}", browse, ctx.name)),
            });
            trail.push(Breadcrumb {
                title: subpage.to_string(),
                link: None,
            });
        }
        None => trail.push(Breadcrumb {
            title: ctx.name.to_string(),
            link: None,
        }),
    }

    trail
}

fn browse_segment(kind: &str) -> String {
    match kind {
        "DeploymentConfig" => "dc".to_string(),
        "ReplicationController" => "rc".to_string(),
        "ReplicaSet" => "rs".to_string(),
        _ => shared::api::kind_to_resource(kind),
    }
}

/// `DeploymentConfig` -> `Deployment Config`
fn humanize_kind(kind: &str) -> String {
    let mut out = String::with_capacity(kind.len() + 4);
    for (i, ch) in kind.chars().enumerate() {
        if i > 0 && ch.is_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
