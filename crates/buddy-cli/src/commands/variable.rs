//! Variable commands (workspace scope, or project scope with `--project`)

use clap::Args;

use buddy_core::VariableType;
use buddy_provider::{ProjectVariableConfig, ProjectVariableState, Resource, VariableConfig, VariableState};

use crate::commands::Context;
use crate::display;
use crate::error::{CliError, Result};

/// Attributes shared by `create` and `update`
#[derive(Args, Debug, Clone)]
pub struct VariableArgs {
    /// Variable name
    #[arg(long)]
    pub key: String,

    /// Variable value (write-only when encrypted)
    #[arg(long)]
    pub value: String,

    /// VAR, SSH_KEY or FILE
    #[arg(long = "type", default_value_t = VariableType::Var)]
    pub var_type: VariableType,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Allow the value to be changed when running a pipeline
    #[arg(long)]
    pub settable: bool,

    /// Store the value encrypted; reads return a hash instead
    #[arg(long)]
    pub encrypted: bool,
}

impl VariableArgs {
    fn to_config(&self) -> VariableConfig {
        VariableConfig {
            key: self.key.clone(),
            value: self.value.clone(),
            var_type: self.var_type,
            description: self.description.clone(),
            settable: self.settable,
            encrypted: self.encrypted,
        }
    }
}

/// Create a variable
pub async fn create(ctx: &Context, args: &VariableArgs, project: Option<&str>) -> Result<()> {
    let config = args.to_config();
    match project {
        Some(project) => {
            let state = ctx
                .provider
                .project_variables()
                .create(&ProjectVariableConfig::new(project, config))
                .await?;
            display::show(&state, ctx.json)
        }
        None => {
            let state = ctx.provider.workspace_variables().create(&config).await?;
            display::show(&state, ctx.json)
        }
    }
}

/// Show a variable
pub async fn get(ctx: &Context, id: &str, project: Option<&str>) -> Result<()> {
    match project {
        Some(project) => display::show(&read_project(ctx, id, project).await?, ctx.json),
        None => display::show(&read_workspace(ctx, id).await?, ctx.json),
    }
}

/// Update a variable in place; the key cannot change
pub async fn update(
    ctx: &Context,
    id: &str,
    args: &VariableArgs,
    project: Option<&str>,
) -> Result<()> {
    let config = args.to_config();
    match project {
        Some(project) => {
            let resource = ctx.provider.project_variables();
            let current = read_project(ctx, id, project).await?;
            let state = resource
                .update(&current, &ProjectVariableConfig::new(project, config))
                .await?;
            display::show(&state, ctx.json)
        }
        None => {
            let resource = ctx.provider.workspace_variables();
            let current = read_workspace(ctx, id).await?;
            let state = resource.update(&current, &config).await?;
            display::show(&state, ctx.json)
        }
    }
}

/// Delete a variable
pub async fn delete(ctx: &Context, id: &str, project: Option<&str>) -> Result<()> {
    match project {
        Some(project) => {
            let current = read_project(ctx, id, project).await?;
            ctx.provider.project_variables().delete(&current).await?;
        }
        None => {
            let current = read_workspace(ctx, id).await?;
            ctx.provider.workspace_variables().delete(&current).await?;
        }
    }

    display::deleted("variable", id, ctx.json)
}

async fn read_workspace(ctx: &Context, id: &str) -> Result<VariableState> {
    ctx.provider
        .workspace_variables()
        .read(id, None)
        .await?
        .ok_or_else(|| CliError::not_found(format!("variable {}", id)))
}

async fn read_project(ctx: &Context, id: &str, project: &str) -> Result<ProjectVariableState> {
    ctx.provider
        .project_variables()
        .read(id, None)
        .await?
        .filter(|state| state.project == project)
        .ok_or_else(|| CliError::not_found(format!("variable {} in project {}", id, project)))
}
