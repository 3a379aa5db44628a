//! Engine client abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::filters::Filters;

/// A container as returned by the engine's list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    pub id: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub state: String,
}

/// An image as returned by the engine's list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageSummary {
    pub id: String,
    /// `None` or `["<none>:<none>"]` for dangling images.
    #[serde(default)]
    pub repo_tags: Option<Vec<String>>,
}

/// List and remove calls against a container engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// List containers. `all` includes stopped containers; when
    /// `include_running` is false, running containers are filtered out.
    async fn list_containers(
        &self,
        all: bool,
        include_running: bool,
        filters: &Filters,
    ) -> EngineResult<Vec<ContainerSummary>>;

    async fn remove_container(&self, id: &str, force: bool, remove_volumes: bool)
        -> EngineResult<()>;

    /// List images. `all` includes intermediate layers.
    async fn list_images(&self, all: bool, filters: &Filters) -> EngineResult<Vec<ImageSummary>>;

    async fn remove_image(&self, id: &str, force: bool) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_summary_ignores_unknown_fields() {
        let json = r#"[{"Id":"abc123","Names":["/web"],"Image":"nginx","State":"running","Status":"Up 2 hours","Ports":[]}]"#;
        let containers: Vec<ContainerSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].id, "abc123");
        assert_eq!(containers[0].names, vec!["/web".to_string()]);
        assert_eq!(containers[0].state, "running");
    }

    #[test]
    fn image_summary_accepts_null_tags() {
        let json = r#"[{"Id":"sha256:1","RepoTags":null,"Size":10},{"Id":"sha256:2","RepoTags":["app:latest"]}]"#;
        let images: Vec<ImageSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(images[0].repo_tags, None);
        assert_eq!(images[1].repo_tags, Some(vec!["app:latest".to_string()]));
    }
}
