use super::command_registry::{
    CommandSpec, FormAction, NO_ARG_COMMANDS, RAW_ARG_COMMANDS, SINGLE_PATH_COMMANDS,
};

/// One line typed into the interactive analysis form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIntent {
    Noop,
    Help,
    Quit,
    ShowDraft,
    ListCategories,
    Analyze,
    Reset,
    SetCategory(String),
    SetFileSize(String),
    SetContext(String),
    SetImage(String),
    Export(String),
    Unknown(String),
}

fn find_action(command: &str, specs: &[CommandSpec]) -> Option<FormAction> {
    specs
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}

fn parse_single_path_arg(arg: &str) -> String {
    if arg.trim().is_empty() {
        return String::new();
    }
    match shell_words::split(arg) {
        Ok(parts) => parts
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect::<Vec<String>>()
            .join(" "),
        Err(_) => arg.trim().to_string(),
    }
}

fn intent_for(action: FormAction, arg: &str) -> FormIntent {
    match action {
        FormAction::Help => FormIntent::Help,
        FormAction::Quit => FormIntent::Quit,
        FormAction::Show => FormIntent::ShowDraft,
        FormAction::Categories => FormIntent::ListCategories,
        FormAction::Analyze => FormIntent::Analyze,
        FormAction::Reset => FormIntent::Reset,
        FormAction::Category => FormIntent::SetCategory(arg.to_string()),
        FormAction::Size => FormIntent::SetFileSize(arg.to_string()),
        FormAction::Context => FormIntent::SetContext(arg.to_string()),
        FormAction::Image => FormIntent::SetImage(parse_single_path_arg(arg)),
        FormAction::Export => FormIntent::Export(parse_single_path_arg(arg)),
    }
}

pub fn parse_form_intent(text: &str) -> FormIntent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return FormIntent::Noop;
    }

    let Some(slash_tail) = raw_trimmed.strip_prefix('/') else {
        return FormIntent::SetContext(raw_trimmed.to_string());
    };
    let command_len = slash_tail
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .count();
    if command_len == 0 {
        return FormIntent::Unknown(raw_trimmed.to_string());
    }
    let command = slash_tail[..command_len].to_ascii_lowercase();
    let arg = slash_tail[command_len..].trim();

    if let Some(action) = find_action(&command, RAW_ARG_COMMANDS) {
        return intent_for(action, arg);
    }
    if let Some(action) = find_action(&command, SINGLE_PATH_COMMANDS) {
        return intent_for(action, arg);
    }
    if let Some(action) = find_action(&command, NO_ARG_COMMANDS) {
        return intent_for(action, "");
    }
    FormIntent::Unknown(command)
}
