//! Static prompt and voice tables.

use serde::Serialize;
use storyreel_core::{ExpansionStyle, VoiceType};
use strum::IntoEnumIterator;

/// Style description appended to the outpainting prompt.
///
/// # Examples
///
/// ```
/// use storyreel_core::ExpansionStyle;
/// use storyreel_models::style_prompt;
///
/// assert!(style_prompt(ExpansionStyle::Anime).contains("动漫"));
/// ```
pub fn style_prompt(style: ExpansionStyle) -> &'static str {
    match style {
        ExpansionStyle::Cinematic => "电影感，专业调色，电影质感，16:9宽屏比例",
        ExpansionStyle::Anime => "动漫风格，鲜艳色彩，二次元画风，16:9宽屏比例",
        ExpansionStyle::Realistic => "写实风格，自然光影，逼真细节，16:9宽屏比例",
        ExpansionStyle::Dreamy => "梦幻风格，柔和色调，朦胧美感，16:9宽屏比例",
        ExpansionStyle::Vintage => "复古胶片风格，暖色调，怀旧感，16:9宽屏比例",
        ExpansionStyle::Artistic => "艺术风格，创意构图，绘画感，16:9宽屏比例",
    }
}

/// Full outpainting prompt: widen the reference to 16:9 keeping its subject intact.
pub fn expansion_prompt(style: ExpansionStyle) -> String {
    format!(
        "基于参考图创建16:9宽屏版本，保持主体内容完整。风格：{}",
        style_prompt(style)
    )
}

/// Provider voice identifier.
///
/// Unknown voice names already parse to [`VoiceType::StandardFemale`], so every name
/// maps to a voice.
///
/// # Examples
///
/// ```
/// use storyreel_core::VoiceType;
/// use storyreel_models::voice_id;
///
/// assert_eq!(voice_id(VoiceType::DeepMale), "zhida");
/// assert_eq!(voice_id(VoiceType::from("whisper".to_string())), "zhitian");
/// ```
pub fn voice_id(voice: VoiceType) -> &'static str {
    match voice {
        VoiceType::StandardFemale => "zhitian",
        VoiceType::StandardMale => "zhizhe",
        VoiceType::GentleFemale => "zhishu",
        VoiceType::DeepMale => "zhida",
        VoiceType::Child => "zhimiao",
        VoiceType::Cartoon => "zhifei",
    }
}

/// Catalog entry describing a selectable voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    /// Voice selector accepted in submissions
    pub id: VoiceType,
    /// Provider voice identifier
    pub provider_voice: &'static str,
    /// Display name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// All selectable voices.
pub fn voice_catalog() -> Vec<VoiceInfo> {
    VoiceType::iter()
        .map(|voice| {
            let (name, description) = match voice {
                VoiceType::StandardFemale => ("知甜", "Warm female voice"),
                VoiceType::StandardMale => ("知哲", "Standard male voice"),
                VoiceType::GentleFemale => ("知树", "Soft female voice"),
                VoiceType::DeepMale => ("知达", "Deep male voice"),
                VoiceType::Child => ("知妙", "Child voice"),
                VoiceType::Cartoon => ("知飞", "Lively female voice"),
            };
            VoiceInfo {
                id: voice,
                provider_voice: voice_id(voice),
                name,
                description,
            }
        })
        .collect()
}

/// Spoken length estimate at five characters per second.
///
/// # Examples
///
/// ```
/// use storyreel_models::estimate_speech_secs;
///
/// assert_eq!(estimate_speech_secs("一二三四五六七八九十"), 2.0);
/// ```
pub fn estimate_speech_secs(text: &str) -> f64 {
    text.chars().count() as f64 / 5.0
}
