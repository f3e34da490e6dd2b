use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tera::{Context, Error as TeraError, Tera};

/// Templates compiled into the binary, looked up by file name
const BUNDLED_PROMPTS: &[(&str, &str)] = &[("system.md", include_str!("prompts/system.md"))];

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered)
}

/// Render a template from disk; a missing file is an error
pub fn load_prompt_file<T: Serialize>(
    template_file: impl Into<PathBuf>,
    context_data: &T,
) -> Result<String, TeraError> {
    let template_path = template_file.into();
    let template_content = fs::read_to_string(&template_path)
        .map_err(|e| TeraError::chain("Failed to read template file", e))?;
    load_prompt(&template_content, context_data)
}

pub fn bundled_prompt(name: &str) -> Option<&'static str> {
    BUNDLED_PROMPTS
        .iter()
        .find(|(bundled, _)| *bundled == name)
        .map(|(_, template)| *template)
}
