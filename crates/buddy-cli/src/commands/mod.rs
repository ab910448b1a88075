//! CLI commands

pub mod member;
pub mod project_member;
pub mod variable;

use buddy_provider::Provider;

/// What every command needs: a configured provider and the output format
pub struct Context {
    pub provider: Provider,
    pub json: bool,
}
