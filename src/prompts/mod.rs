//! Migration prompt templates.
//!
//! Each prompt instructs an assistant how to draft TypeORM migration SQL for
//! one downstream project and takes a single `userInstructions` argument that
//! is spliced into the template.

mod agrotrace;
mod checkmilk;

use crate::error::{DbError, DbResult};
use rmcp::model::{Prompt, PromptArgument};
use serde_json::{Map, Value};

/// Name of the only prompt argument.
pub const USER_INSTRUCTIONS_ARG: &str = "userInstructions";

const PLACEHOLDER: &str = "{user_instructions}";

static PROMPTS: &[MigrationPrompt] = &[agrotrace::PROMPT, checkmilk::PROMPT];

/// A static migration prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationPrompt {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    template: &'static str,
}

impl MigrationPrompt {
    /// Every registered prompt, in listing order.
    pub fn all() -> &'static [MigrationPrompt] {
        PROMPTS
    }

    /// Find a prompt by exact name.
    pub fn find(name: &str) -> Option<&'static MigrationPrompt> {
        PROMPTS.iter().find(|p| p.name == name)
    }

    /// Render the template with the `userInstructions` argument.
    ///
    /// The argument must be present and a string; an empty string is accepted.
    pub fn render(&self, arguments: Option<&Map<String, Value>>) -> DbResult<String> {
        let instructions = arguments
            .and_then(|args| args.get(USER_INSTRUCTIONS_ARG))
            .ok_or_else(|| {
                DbError::invalid_input(format!(
                    "Prompt '{}' requires the '{}' argument",
                    self.name, USER_INSTRUCTIONS_ARG
                ))
            })?;

        let instructions = instructions.as_str().ok_or_else(|| {
            DbError::invalid_input(format!("'{}' must be a string", USER_INSTRUCTIONS_ARG))
        })?;

        Ok(self.template.replace(PLACEHOLDER, instructions))
    }

    /// Listing entry advertised through `prompts/list`.
    pub fn to_prompt(&self) -> Prompt {
        let argument = PromptArgument {
            name: USER_INSTRUCTIONS_ARG.to_string(),
            title: None,
            description: Some("What the migration must do".to_string()),
            required: Some(true),
        };
        let mut prompt = Prompt::new(self.name, Some(self.description), Some(vec![argument]));
        prompt.title = Some(self.title.to_string());
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_registry_lists_both_prompts() {
        let names: Vec<_> = MigrationPrompt::all().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["agrotrace-migration-prompt", "checkmilk-migration-prompt"]
        );
    }

    #[test]
    fn test_find_unknown_prompt() {
        assert!(MigrationPrompt::find("agrotrace").is_none());
        assert!(MigrationPrompt::find("agrotrace-migration-prompt").is_some());
    }

    #[test]
    fn test_render_appends_instructions() {
        let prompt = MigrationPrompt::find("agrotrace-migration-prompt").unwrap();
        let text = prompt
            .render(Some(&args(json!({ "userInstructions": "create table talhao" }))))
            .unwrap();
        assert!(text.contains("create table talhao"));
        assert!(text.contains("get_table_details(connectionName: 'agrotrace'"));
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn test_checkmilk_mentions_conventions() {
        let prompt = MigrationPrompt::find("checkmilk-migration-prompt").unwrap();
        let text = prompt
            .render(Some(&args(json!({ "userInstructions": "" }))))
            .unwrap();
        assert!(text.contains("get_table_details(connectionName: 'checkmilk'"));
        assert!(text.contains("fun_usuario_conectado()"));
        assert!(text.contains("synchronized_at"));
    }

    #[test]
    fn test_agrotrace_keeps_worked_examples() {
        let prompt = MigrationPrompt::find("agrotrace-migration-prompt").unwrap();
        let text = prompt
            .render(Some(&args(json!({ "userInstructions": "adicionar coluna apelido" }))))
            .unwrap();
        assert!(text.starts_with("\nVocê é um assistente especialista"));
        assert!(text.contains("CREATE TABLE ad_registro_categoria ("));
        assert!(text.contains("CREATE TRIGGER registro_categoria_di"));
        assert!(text.contains("ADD COLUMN nova_coluna VARCHAR(100) DEFAULT NULL AFTER coluna_existente;"));
        assert!(text.contains("9) **Transacionalidade e segurança**"));
        assert!(text.contains("VALUES (\\'Registro Categoria\\'"));
        assert!(text.contains("User Instructions:\n\nadicionar coluna apelido\n"));
    }

    #[test]
    fn test_render_missing_argument() {
        let prompt = MigrationPrompt::find("checkmilk-migration-prompt").unwrap();
        let err = prompt.render(None).unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));

        let err = prompt.render(Some(&args(json!({})))).unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
    }

    #[test]
    fn test_render_rejects_non_string() {
        let prompt = MigrationPrompt::find("agrotrace-migration-prompt").unwrap();
        let err = prompt
            .render(Some(&args(json!({ "userInstructions": 42 }))))
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
    }

    #[test]
    fn test_to_prompt_has_required_argument() {
        let prompt = MigrationPrompt::find("agrotrace-migration-prompt")
            .unwrap()
            .to_prompt();
        assert_eq!(prompt.title.as_deref(), Some("Create Agrotrace Migrations"));
        let arguments = prompt.arguments.unwrap();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].name, "userInstructions");
        assert_eq!(arguments[0].required, Some(true));
    }
}
