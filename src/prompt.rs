//! 説明文の対話入力

use crate::error::{MemeGenError, Result};
use dialoguer::{Input, Select};
use meme_gen_common::input::{visible_suggestions, MAX_DESCRIPTION_CHARS};

const FREE_TEXT_LABEL: &str = "自由に入力...";

/// 候補から選ぶか、自由に入力する
pub fn ask_description() -> Result<String> {
    let suggestions = visible_suggestions();
    let mut items: Vec<&str> = suggestions.to_vec();
    items.push(FREE_TEXT_LABEL);

    let choice = Select::new()
        .with_prompt("どのように変更しますか？")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| MemeGenError::Prompt(e.to_string()))?;

    if let Some(suggestion) = suggestions.get(choice) {
        return Ok(suggestion.to_string());
    }

    let input: String = Input::new()
        .with_prompt(format!("変更内容（最大{}文字）", MAX_DESCRIPTION_CHARS))
        .validate_with(|text: &String| -> std::result::Result<(), &str> {
            if text.trim().is_empty() {
                Err("変更内容を入力してください")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| MemeGenError::Prompt(e.to_string()))?;

    Ok(input)
}
