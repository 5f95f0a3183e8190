//! Input rules checked before any request is sent.

use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_entity::item::{ItemKind, ItemStatus};
use crm_entity::request::{ItemUpdate, NewFile, NewFolder};

/// Maximum item name length in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Maximum description length in whitespace-separated words.
pub const MAX_DESCRIPTION_WORDS: usize = 100;

/// Validates and trims an item name.
pub fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    let len = name.chars().count();
    if len > MAX_NAME_CHARS {
        return Err(AppError::validation(format!(
            "Name must be {MAX_NAME_CHARS} characters or fewer (found {len})"
        )));
    }
    reject_markup("Name", name)?;
    Ok(name.to_string())
}

/// Validates a description. Blank descriptions are accepted.
pub fn validate_description(description: &str) -> AppResult<()> {
    let words = description.split_whitespace().count();
    if words > MAX_DESCRIPTION_WORDS {
        return Err(AppError::validation(format!(
            "Description must be {MAX_DESCRIPTION_WORDS} words or fewer (found {words})"
        )));
    }
    reject_markup("Description", description)
}

/// Validates tags, trimming each and dropping blanks.
pub fn validate_tags(tags: Vec<String>) -> AppResult<Vec<String>> {
    let mut cleaned = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        reject_markup("Tag", tag)?;
        cleaned.push(tag.to_string());
    }
    Ok(cleaned)
}

/// Rejects statuses the item kind does not accept.
pub fn validate_status(status: ItemStatus, kind: ItemKind) -> AppResult<()> {
    if status.is_allowed_for(kind) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Status '{status}' is not allowed for a {kind}"
        )))
    }
}

/// Normalized copy of a folder creation request.
pub fn validate_new_folder(mut folder: NewFolder) -> AppResult<NewFolder> {
    folder.name = validate_name(&folder.name)?;
    if let Some(description) = &folder.description {
        validate_description(description)?;
    }
    folder.tags = validate_tags(folder.tags)?;
    validate_status(folder.status, ItemKind::Folder)?;
    Ok(folder)
}

/// Normalized copy of a file upload request.
pub fn validate_new_file(mut file: NewFile) -> AppResult<NewFile> {
    file.name = validate_name(&file.name)?;
    file.category = file.category.trim().to_string();
    if file.category.is_empty() {
        return Err(AppError::validation("Category is required"));
    }
    reject_markup("Category", &file.category)?;
    if let Some(description) = &file.description {
        validate_description(description)?;
    }
    file.tags = validate_tags(file.tags)?;
    validate_status(file.status, ItemKind::File)?;
    Ok(file)
}

/// Normalized copy of an edit to an item of `kind`.
///
/// Category edits are dropped for folders.
pub fn validate_update(mut update: ItemUpdate, kind: ItemKind) -> AppResult<ItemUpdate> {
    if update.is_empty() {
        return Err(AppError::validation("Nothing to update"));
    }
    if let Some(name) = update.name.as_deref() {
        update.name = Some(validate_name(name)?);
    }
    match kind {
        ItemKind::Folder => update.category = None,
        ItemKind::File => {
            if let Some(category) = update.category.as_deref() {
                let category = category.trim();
                if category.is_empty() {
                    return Err(AppError::validation("Category is required"));
                }
                reject_markup("Category", category)?;
                update.category = Some(category.to_string());
            }
        }
    }
    if let Some(description) = &update.description {
        validate_description(description)?;
    }
    if let Some(tags) = update.tags.take() {
        update.tags = Some(validate_tags(tags)?);
    }
    if let Some(status) = update.status {
        validate_status(status, kind)?;
    }
    Ok(update)
}

fn reject_markup(field: &str, value: &str) -> AppResult<()> {
    if value.contains(['<', '>']) {
        return Err(AppError::validation(format!(
            "{field} must not contain '<' or '>'"
        )));
    }
    Ok(())
}
