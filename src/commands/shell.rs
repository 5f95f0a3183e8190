//! Interactive browser session.
//!
//! Browser operations report their own outcome through the console
//! notifier, so only failures that happen before reaching the browser
//! (unknown names, bad arguments, local I/O) are printed here.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use crm_browser::filter::parse_category;
use crm_browser::{Confirmer, DragPayload, DropTarget, ItemBrowser};
use crm_core::config::AppConfig;
use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_core::types::Selection;
use crm_entity::item::ItemStatus;
use crm_entity::request::{ItemUpdate, NewFile, NewFolder};

use crate::output::{self, ConsoleNotifier, OutputFormat};

/// Category given to uploads when none is named and no category filter is set.
const DEFAULT_UPLOAD_CATEGORY: &str = "General";

const HELP: &str = "\
Commands:
  ls                        list the open folder
  cd <name>                 open a subfolder
  up                        go to the parent folder
  crumb <n>                 jump to breadcrumb n (0 is root)
  root                      go to root
  find <text>               filter by name or tag (empty clears)
  category <name|all>       filter files by category
  status <status|all>       filter files by status
  mkdir <name>              create a folder here
  upload <path> [category]  upload a local file here
  rename <name> <new name>  rename an item
  tag <name> <t1,t2,...>    replace an item's tags
  set-status <name> <s>     change an item's status
  mv <name> <folder|..>     move an item into a folder or up one level
  rm <name>                 delete an item
  get <name> [dir]          download a file
  exit                      leave the shell";

/// Asks on the terminal before destructive actions.
#[derive(Debug, Clone, Default)]
pub struct TerminalConfirm;

impl Confirmer for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Run the shell until `exit` or end of input.
pub async fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let mut browser = super::open_browser(config, Arc::new(ConsoleNotifier))?;
    let _ = browser.refresh().await;
    println!("Type 'help' for commands.");

    loop {
        let line: String = match dialoguer::Input::new()
            .with_prompt(browser.path().display())
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(error = %e, "Input closed");
                break;
            }
        };

        match run_line(&mut browser, config, format, line.trim()).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(e) => output::print_error(e.user_message()),
        }
    }

    Ok(())
}

async fn run_line(
    browser: &mut ItemBrowser,
    config: &AppConfig,
    format: OutputFormat,
    line: &str,
) -> AppResult<Flow> {
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => {}
        "help" => println!("{HELP}"),
        "exit" | "quit" => return Ok(Flow::Exit),
        "ls" => output::print_items(&browser.visible(), format),
        "cd" => {
            let item = super::find_visible(browser, required(rest, "cd <name>")?)?;
            let _ = browser.open_folder(&item).await;
        }
        "up" => match browser.path().len() {
            0 => {}
            len => {
                let _ = browser.navigate_to_breadcrumb(len - 1).await;
            }
        },
        "crumb" => {
            let index = required(rest, "crumb <n>")?
                .parse::<usize>()
                .map_err(|_| AppError::validation(format!("'{rest}' is not a breadcrumb index")))?;
            let _ = browser.navigate_to_breadcrumb(index).await;
        }
        "root" => {
            let _ = browser.go_to_root().await;
        }
        "find" => browser.set_query(rest),
        "category" => {
            browser.set_category(parse_category(rest));
            let _ = browser.refresh().await;
        }
        "status" => {
            let status: Selection<ItemStatus> = required(rest, "status <status|all>")?.parse()?;
            browser.set_status(status);
        }
        "mkdir" => {
            let name = required(rest, "mkdir <name>")?;
            let _ = browser.create_folder(NewFolder::named(name)).await;
        }
        "upload" => upload(browser, rest).await?,
        "rename" => {
            let (name, new_name) = two_args(rest, "rename <name> <new name>")?;
            let item = super::find_visible(browser, name)?;
            let _ = browser.rename(item.id(), item.kind(), new_name).await;
        }
        "tag" => {
            let (name, tags) = two_args(rest, "tag <name> <t1,t2,...>")?;
            let item = super::find_visible(browser, name)?;
            let update = ItemUpdate {
                tags: Some(tags.split(',').map(str::to_string).collect()),
                ..ItemUpdate::default()
            };
            let _ = browser.update(item.id(), item.kind(), update).await;
        }
        "set-status" => {
            let (name, status) = two_args(rest, "set-status <name> <status>")?;
            let item = super::find_visible(browser, name)?;
            let update = ItemUpdate {
                status: Some(status.parse()?),
                ..ItemUpdate::default()
            };
            let _ = browser.update(item.id(), item.kind(), update).await;
        }
        "mv" => {
            let (name, destination) = two_args(rest, "mv <name> <folder|..>")?;
            let item = super::find_visible(browser, name)?;
            let target = if destination == ".." {
                DropTarget::BreadcrumbBar
            } else {
                let folder = super::find_visible(browser, destination)?;
                DropTarget::for_item(&folder).ok_or_else(|| {
                    AppError::validation(format!("'{destination}' is not a folder"))
                })?
            };
            let _ = browser
                .handle_drop(&DragPayload::for_item(&item), &target)
                .await;
        }
        "rm" => {
            let item = super::find_visible(browser, required(rest, "rm <name>")?)?;
            if let Ok(false) = browser.delete(item.id(), item.kind(), &TerminalConfirm).await {
                println!("Cancelled.");
            }
        }
        "get" => {
            let (name, dir) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let item = super::find_visible(browser, required(name, "get <name> [dir]")?)?;
            let dir = match dir.trim() {
                "" => config.browser.download_dir.as_str(),
                dir => dir,
            };
            if let Ok(file) = browser.download(item.id(), item.kind()).await {
                let saved = file.save_into(dir).await?;
                output::print_success(&format!("Saved {}", saved.display()));
            }
        }
        other => {
            return Err(AppError::validation(format!(
                "Unknown command '{other}'. Type 'help' for commands."
            )));
        }
    }

    Ok(Flow::Continue)
}

async fn upload(browser: &mut ItemBrowser, args: &str) -> AppResult<()> {
    let (path, category) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    let path = Path::new(required(path, "upload <path> [category]")?);
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("'{}' has no file name", path.display())))?
        .to_string();
    let content = tokio::fs::read(path).await?;

    let category = match category.trim() {
        "" => browser
            .filter()
            .category
            .value()
            .cloned()
            .unwrap_or_else(|| DEFAULT_UPLOAD_CATEGORY.to_string()),
        category => category.to_string(),
    };

    let _ = browser
        .upload_file(NewFile::new(name, category, Bytes::from(content)))
        .await;
    Ok(())
}

fn required<'a>(value: &'a str, usage: &str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("Usage: {usage}")));
    }
    Ok(value)
}

/// Split `"<first> <rest>"`; the second argument may contain spaces.
fn two_args<'a>(value: &'a str, usage: &str) -> AppResult<(&'a str, &'a str)> {
    let (first, second) = value
        .split_once(char::is_whitespace)
        .ok_or_else(|| AppError::validation(format!("Usage: {usage}")))?;
    Ok((required(first, usage)?, required(second, usage)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_args_keeps_spaces_in_second() {
        assert_eq!(
            two_args("old.pdf New Name.pdf", "x").unwrap(),
            ("old.pdf", "New Name.pdf")
        );
        assert!(two_args("only", "x").is_err());
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("  ", "cd <name>").is_err());
        assert_eq!(required(" a ", "cd <name>").unwrap(), "a");
    }
}
