//! Voices command handler.

use storyreel::{JsonError, StoryreelResult, voice_catalog};

/// Prints the voice catalog.
pub fn list_voices(json: bool) -> StoryreelResult<()> {
    let catalog = voice_catalog();
    if json {
        let text = serde_json::to_string_pretty(&catalog)
            .map_err(|e| JsonError::new("voice catalog", e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    println!("{:<16} {:<10} {:<6} DESCRIPTION", "ID", "PROVIDER", "NAME");
    for voice in catalog {
        println!(
            "{:<16} {:<10} {:<6} {}",
            voice.id.to_string(),
            voice.provider_voice,
            voice.name,
            voice.description
        );
    }
    Ok(())
}
