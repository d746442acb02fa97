use std::io::{self, ErrorKind, Write};
use std::path::Path;

use anyhow::Result;
use famopt_contracts::analysis::{AnalysisState, FamilyCategory};
use famopt_contracts::form::{parse_form_intent, FormIntent, FORM_HELP_COMMANDS};
use famopt_engine::{AnalysisSession, EngineConfig, FormDraft, ProviderRegistry};

use crate::report::{render_html, render_text, ReportView};
use crate::{now_utc_iso, submit_with_spinner, write_output};

pub(crate) fn run_form(config: EngineConfig, color: bool) -> Result<()> {
    let registry = ProviderRegistry::from_config(&config);
    let provider = registry.resolve(&config.provider)?;
    let mut session = AnalysisSession::new();

    let stdin = io::stdin();
    let mut line = String::new();

    println!(
        "famopt form started (provider: {}). Type /help for commands.",
        provider.name()
    );

    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        match parse_form_intent(line.trim_end_matches(['\n', '\r'])) {
            FormIntent::Noop => continue,
            FormIntent::Quit => break,
            FormIntent::Help => {
                println!("Commands: {}", FORM_HELP_COMMANDS.join(" "));
                println!("Any other text sets the additional context.");
            }
            FormIntent::ListCategories => {
                for category in FamilyCategory::ALL {
                    println!("  {:<12} {}", category.key(), category.label());
                }
            }
            FormIntent::ShowDraft => {
                print!("{}", describe_draft(session.draft(), session.state()));
            }
            FormIntent::SetCategory(raw) => match session.draft_mut().set_category(&raw) {
                Ok(category) => println!("Category set to {category}"),
                Err(err) => println!("{err}. Type /categories to list them."),
            },
            FormIntent::SetFileSize(raw) => match session.draft_mut().set_file_size(&raw) {
                Ok(value) => println!("File size set to {value} MB"),
                Err(err) => println!("{err}"),
            },
            FormIntent::SetContext(text) => {
                session.draft_mut().set_context(&text);
                if session.draft().additional_context.is_empty() {
                    println!("Context cleared");
                } else {
                    println!("Context set");
                }
            }
            FormIntent::SetImage(path) => {
                if path.is_empty() {
                    println!("/image requires a path");
                    continue;
                }
                match session.draft_mut().set_image_path(Path::new(&path)) {
                    Ok(()) => println!("Screenshot set to {path}"),
                    Err(err) => println!("{err}"),
                }
            }
            FormIntent::Analyze => {
                if !session.can_submit() {
                    println!("Choose a screenshot with /image before analyzing.");
                    continue;
                }
                match submit_with_spinner(&mut session, provider) {
                    Ok(AnalysisState::Success(result)) => {
                        print!("{}", render_text(&ReportView::from_result(&result), color));
                        println!("Type /reset to analyze another family.");
                    }
                    Ok(AnalysisState::Failure(message)) => {
                        println!("Analysis failed: {message}");
                    }
                    Ok(_) => {}
                    Err(err) => println!("{err:#}"),
                }
            }
            FormIntent::Reset => match session.reset() {
                Ok(()) => println!("Report cleared. Back to the form."),
                Err(err) => println!("{err}"),
            },
            FormIntent::Export(path) => {
                if path.is_empty() {
                    println!("/export requires a path");
                    continue;
                }
                let Some(result) = session.state().result() else {
                    println!("No report to export. Run /analyze first.");
                    continue;
                };
                let html = render_html(&ReportView::from_result(result), &now_utc_iso());
                match write_output(Path::new(&path), &html) {
                    Ok(()) => println!("Report exported to {path}"),
                    Err(err) => println!("Export failed: {err:#}"),
                }
            }
            FormIntent::Unknown(command) => {
                println!("Unknown command: {command}. Type /help for commands.");
            }
        }
    }

    Ok(())
}

fn describe_draft(draft: &FormDraft, state: &AnalysisState) -> String {
    let context = if draft.additional_context.is_empty() {
        "(none)"
    } else {
        draft.additional_context.as_str()
    };
    let image = draft.image_source.as_deref().unwrap_or("(not selected)");
    format!(
        "Category:   {}\nFile size:  {} MB\nScreenshot: {}\nContext:    {}\nReport:     {}\n",
        draft.category,
        draft.file_size_mb,
        image,
        context,
        state.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_summary_lists_every_field() {
        let mut draft = FormDraft::default();
        let summary = describe_draft(&draft, &AnalysisState::Idle);
        assert!(summary.contains("Category:   Furniture"));
        assert!(summary.contains("File size:  0.5 MB"));
        assert!(summary.contains("Screenshot: (not selected)"));
        assert!(summary.contains("Report:     idle"));

        draft.set_context("twelve nested families");
        draft.set_image_data_url("data:image/png;base64,AAAA");
        let summary = describe_draft(&draft, &AnalysisState::failure("boom"));
        assert!(summary.contains("Context:    twelve nested families"));
        assert!(summary.contains("Screenshot: inline data"));
        assert!(summary.contains("Report:     failure"));
    }
}
