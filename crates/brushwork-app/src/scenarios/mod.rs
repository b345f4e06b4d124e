//! Scenario catalog: the named prompt experiments and their input-image
//! probing. The orchestration core never sees paths or globs, only the
//! resolved byte buffers.

pub mod prompts;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::services::{NamedPrompt, ReferenceImage};

pub fn ip_bonanza() -> NamedPrompt {
    NamedPrompt::new("ip_bonanza_characters_nightclub", prompts::IP_BONANZA)
}

pub fn code_generation() -> NamedPrompt {
    NamedPrompt::new("code_generation_fibonacci_magnets", prompts::CODE_GENERATION)
}

/// Two prompt variants wrapping a pretty-printed character sheet.
pub fn character_json(character: &serde_json::Value) -> Vec<NamedPrompt> {
    let sheet = serde_json::to_string_pretty(character)
        .unwrap_or_else(|_| character.to_string());

    let basic = format!(
        "\nGenerate a photo featuring the specified person. The photo is taken for a Vanity Fair cover profile of the person. Do not include any logos, text, or watermarks.\n---\n{sheet}\n"
    );
    let detailed = format!(
        "\nGenerate a photo featuring a closeup of the specified human person. The person is standing rotated 20 degrees making their `signature_pose` and their complete body is visible in the photo at the `nationality_origin` location. The photo is taken with a Canon EOS 90D DSLR camera for a Vanity Fair cover profile of the person with real-world natural lighting and real-world natural uniform depth of field (DOF). Do not include any logos, text, or watermarks.\n\nThe photo MUST accurately include and display all of the person's attributes from this JSON:\n---\n{sheet}\n"
    );

    vec![
        NamedPrompt::new("character_json_attempt1_basic", basic),
        NamedPrompt::new("character_json_attempt2_detailed", detailed),
    ]
}

pub fn system_prompt_list() -> Vec<NamedPrompt> {
    prompts::SYSTEM_PROMPT_LIST
        .iter()
        .map(|(name, prompt)| NamedPrompt::new(*name, *prompt))
        .collect()
}

pub fn ugly_sonic_prompts() -> Vec<NamedPrompt> {
    vec![
        NamedPrompt::new("ugly_sonic_obama_basic", prompts::UGLY_SONIC_BASIC),
        NamedPrompt::new("ugly_sonic_obama_pulitzer", prompts::UGLY_SONIC_PULITZER),
        NamedPrompt::new(
            "ugly_sonic_obama_no_watermarks",
            prompts::UGLY_SONIC_NO_WATERMARKS,
        ),
    ]
}

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Load one reference image, sniffing the mime type from the extension.
pub fn load_reference_image(path: &Path) -> io::Result<ReferenceImage> {
    let mime = mime_for(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported reference image extension: {}", path.display()),
        )
    })?;
    Ok(ReferenceImage::new(fs::read(path)?, mime))
}

/// First existing candidate path, if any.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.exists()).cloned()
}

/// Default probe locations for the Ghibli selfie input.
pub fn ghibli_candidates() -> Vec<PathBuf> {
    [
        "prompt_imgs/max_selfie.webp",
        "input_images/selfie.jpg",
        "input_images/selfie.png",
        "input_images/selfie.webp",
        "selfie.jpg",
        "selfie.png",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

/// Default probe directories for the Ugly Sonic reference set.
pub fn ugly_sonic_default_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("prompt_imgs"), PathBuf::from("input_images")]
}

/// Scan `dirs` in order for files named `{prefix}*.{jpg,jpeg,png,webp}`.
/// The first directory containing any match wins; results are sorted by
/// file name for a stable reference order.
pub fn find_prefixed_images(dirs: &[PathBuf], prefix: &str) -> io::Result<Vec<PathBuf>> {
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let mut matches: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix))
                    && mime_for(path).is_some()
            })
            .collect();
        if !matches.is_empty() {
            matches.sort();
            return Ok(matches);
        }
    }
    Ok(Vec::new())
}
