use std::path::Path;

use crate::flowers::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn resolve_path(root: &Path, file_path: &str) -> String {
    root.join(file_path).display().to_string()
}

/// The reader to use for a file: the forced type if any, otherwise the extension decides.
pub fn input_type(path: &str, forced: Option<&str>) -> FlowerResult<InputType> {
    let extension = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    let name = forced.map(|s| s.to_lowercase()).or(extension);
    match name.as_deref() {
        Some("csv") => Ok(InputType::Csv),
        Some("xlsx") | Some("excel") => Ok(InputType::Xlsx),
        _ => UnknownInputTypeSnafu { path }.fail(),
    }
}
