// Project service - Use case for suggesting builds from salvaged parts
use crate::application::analysis_gateway::{AnalysisGateway, GatewayError};
use crate::domain::project::ProjectIdea;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("component list is empty")]
    EmptyComponentList,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone)]
pub struct ProjectService {
    gateway: Arc<dyn AnalysisGateway>,
}

impl ProjectService {
    pub fn new(gateway: Arc<dyn AnalysisGateway>) -> Self {
        Self { gateway }
    }

    pub async fn suggest(&self, component_list: &str) -> Result<Vec<ProjectIdea>, ProjectError> {
        let component_list = component_list.trim();
        if component_list.is_empty() {
            return Err(ProjectError::EmptyComponentList);
        }

        let ideas = self.gateway.suggest_projects(component_list).await?;
        tracing::debug!("Received {} project ideas", ideas.len());
        Ok(ideas)
    }
}
