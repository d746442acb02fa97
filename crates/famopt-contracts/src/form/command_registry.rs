#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormAction {
    Help,
    Quit,
    Show,
    Categories,
    Analyze,
    Reset,
    Category,
    Size,
    Context,
    Image,
    Export,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: FormAction,
}

pub(crate) const RAW_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "category",
        action: FormAction::Category,
    },
    CommandSpec {
        command: "size",
        action: FormAction::Size,
    },
    CommandSpec {
        command: "context",
        action: FormAction::Context,
    },
];

pub(crate) const SINGLE_PATH_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "image",
        action: FormAction::Image,
    },
    CommandSpec {
        command: "export",
        action: FormAction::Export,
    },
];

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "help",
        action: FormAction::Help,
    },
    CommandSpec {
        command: "show",
        action: FormAction::Show,
    },
    CommandSpec {
        command: "categories",
        action: FormAction::Categories,
    },
    CommandSpec {
        command: "analyze",
        action: FormAction::Analyze,
    },
    CommandSpec {
        command: "reset",
        action: FormAction::Reset,
    },
    CommandSpec {
        command: "quit",
        action: FormAction::Quit,
    },
    CommandSpec {
        command: "exit",
        action: FormAction::Quit,
    },
];

pub const FORM_HELP_COMMANDS: &[&str] = &[
    "/category",
    "/categories",
    "/size",
    "/image",
    "/context",
    "/show",
    "/analyze",
    "/reset",
    "/export",
    "/help",
    "/quit",
];
