//! Display formatting for CLI output
//!
//! Single records print as aligned `key  value` lines, member pages as a
//! table. `--json` switches everything to pretty JSON on stdout.

use console::style;
use serde::Serialize;

use buddy_core::MemberList;
use buddy_provider::{ProjectMemberState, ProjectVariableState, VariableState, WorkspaceMemberState};

use crate::error::{CliError, Result};

const EMPTY: &str = "-";
const HIDDEN: &str = "<encrypted>";

/// Records that can be shown as key/value lines
pub trait Fields {
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// Print one record in the selected format
pub fn show<T: Serialize + Fields>(record: &T, json: bool) -> Result<()> {
    if json {
        print_json(record)
    } else {
        print!("{}", render_fields(&record.fields()));
        Ok(())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Confirm a deletion
pub fn deleted(kind: &str, id: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&serde_json::json!({ "deleted": kind, "id": id }));
    }
    println!("{} Deleted {} {}", style("✓").green(), kind, id);
    Ok(())
}

/// Align keys to the widest one
pub fn render_fields(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in fields {
        let value = if value.is_empty() { EMPTY } else { value.as_str() };
        out.push_str(&format!(
            "{}  {}\n",
            style(format!("{:<width$}", key, width = width)).bold(),
            value
        ));
    }
    out
}

/// Member page as a table
pub fn render_member_table(list: &MemberList) -> String {
    let mut out = format!(
        "{:<8} {:<30} {:<25} {}\n",
        "ID", "EMAIL", "NAME", "ADMIN"
    );
    out.push_str(&"-".repeat(72));
    out.push('\n');
    for member in &list.members {
        out.push_str(&format!(
            "{:<8} {:<30} {:<25} {}\n",
            member.id,
            member.email,
            member.name,
            if member.admin { "yes" } else { "no" }
        ));
    }
    out
}

fn variable_fields(state: &VariableState) -> Vec<(&'static str, String)> {
    let value = if state.encrypted && !state.value.is_empty() {
        HIDDEN.to_string()
    } else {
        state.value.clone()
    };
    vec![
        ("id", state.id.to_string()),
        ("key", state.key.clone()),
        ("value", value),
        ("value_hash", state.value_hash.clone()),
        ("type", state.var_type.to_string()),
        ("description", state.description.clone()),
        ("settable", state.settable.to_string()),
        ("encrypted", state.encrypted.to_string()),
        ("ssh_key", state.ssh_key.to_string()),
    ]
}

impl Fields for VariableState {
    fn fields(&self) -> Vec<(&'static str, String)> {
        variable_fields(self)
    }
}

impl Fields for ProjectVariableState {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = variable_fields(&self.variable);
        fields.insert(1, ("project", self.project.clone()));
        fields
    }
}

impl Fields for WorkspaceMemberState {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("email", self.email.clone()),
            ("name", self.name.clone()),
            ("title", self.title.clone()),
            ("admin", self.admin.to_string()),
            ("workspace_owner", self.workspace_owner.to_string()),
        ]
    }
}

impl Fields for ProjectMemberState {
    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.clone()),
            ("project_name", self.project_name.clone()),
            ("member_id", self.member_id.to_string()),
            ("permission_set_id", self.permission_set_id.to_string()),
            ("permission_set_name", self.permission_set_name.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::WorkspaceMember;

    #[test]
    fn test_render_fields_aligns_and_fills_empty() {
        console::set_colors_enabled(false);
        let out = render_fields(&[("id", "1".to_string()), ("title", String::new())]);
        assert_eq!(out, "id     1\ntitle  -\n");
    }

    #[test]
    fn test_encrypted_value_hidden() {
        let state = VariableState {
            id: 3,
            key: "SECRET".to_string(),
            value: "hunter2".to_string(),
            value_hash: "abc".to_string(),
            encrypted: true,
            ..Default::default()
        };
        let fields = state.fields();
        assert!(fields.contains(&("value", HIDDEN.to_string())));
        assert!(fields.contains(&("value_hash", "abc".to_string())));
    }

    #[test]
    fn test_project_variable_lists_project_second() {
        let state = ProjectVariableState {
            project: "web".to_string(),
            variable: VariableState::default(),
        };
        assert_eq!(state.fields()[1], ("project", "web".to_string()));
    }

    #[test]
    fn test_member_table() {
        let list = MemberList {
            members: vec![WorkspaceMember {
                id: 2,
                email: "b@x.com".to_string(),
                name: "bob".to_string(),
                admin: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        let table = render_member_table(&list);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].starts_with("2 "));
        assert!(lines[2].ends_with("yes"));
    }
}
