//! Project member commands

use buddy_core::ProjectMemberId;
use buddy_provider::{ProjectMemberConfig, ProjectMemberState, Resource};

use crate::commands::Context;
use crate::display;
use crate::error::{CliError, Result};

/// Grant a workspace member access to a project
pub async fn add(ctx: &Context, project: &str, member_id: u64, permission_set: u64) -> Result<()> {
    let state = ctx
        .provider
        .project_members()
        .create(&ProjectMemberConfig::new(project, member_id, permission_set))
        .await?;
    display::show(&state, ctx.json)
}

pub async fn get(ctx: &Context, project: &str, member_id: u64) -> Result<()> {
    display::show(&read(ctx, project, member_id).await?, ctx.json)
}

/// Switch the member to another permission set
pub async fn update(
    ctx: &Context,
    project: &str,
    member_id: u64,
    permission_set: u64,
) -> Result<()> {
    let current = read(ctx, project, member_id).await?;
    let state = ctx
        .provider
        .project_members()
        .update(
            &current,
            &ProjectMemberConfig::new(project, member_id, permission_set),
        )
        .await?;
    display::show(&state, ctx.json)
}

pub async fn remove(ctx: &Context, project: &str, member_id: u64) -> Result<()> {
    let current = read(ctx, project, member_id).await?;
    ctx.provider.project_members().delete(&current).await?;
    display::deleted("project member", &current.id, ctx.json)
}

async fn read(ctx: &Context, project: &str, member_id: u64) -> Result<ProjectMemberState> {
    let id = ProjectMemberId::new(project, member_id).to_string();
    ctx.provider
        .project_members()
        .read(&id, None)
        .await?
        .ok_or_else(|| CliError::not_found(format!("project member {}", id)))
}
