//! @ai:module:intent Render a profile into a natural-language system prompt
//! @ai:module:layer domain
//! @ai:module:public_api PromptSections, build_system_prompt
//! @ai:module:stateless true

use crate::profile::types::Profile;

const DEFAULT_ROLE: &str = "a professional";
const SECTION_SEPARATOR: &str = "\n\n";

/// @ai:intent The rendered prompt, split into its fixed-order sections
/// @ai:invariant joining the sections with SECTION_SEPARATOR yields build_system_prompt output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSections {
    pub header: String,
    pub identity: String,
    pub communication_style: String,
    pub instructions: String,
    pub additional: Option<String>,
}

impl PromptSections {
    /// @ai:intent Render every section of the system prompt for a profile
    /// @ai:effects pure
    pub fn render(profile: &Profile, addendum: Option<&str>) -> Self {
        Self {
            header: render_header(profile),
            identity: render_identity(profile),
            communication_style: render_communication_style(profile),
            instructions: render_instructions(profile),
            additional: addendum
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(|a| format!("ADDITIONAL INSTRUCTIONS:\n{}", a)),
        }
    }

    /// @ai:intent Join the sections into the final prompt text
    /// @ai:effects pure
    pub fn join(&self) -> String {
        let mut parts: Vec<&str> = vec![
            &self.header,
            &self.identity,
            &self.communication_style,
            &self.instructions,
        ];

        if let Some(ref additional) = self.additional {
            parts.push(additional);
        }

        parts.join(SECTION_SEPARATOR)
    }
}

/// @ai:intent Build the system prompt injected alongside user queries
/// @ai:post same profile and addendum always produce byte-identical output
/// @ai:effects pure
pub fn build_system_prompt(profile: &Profile, addendum: Option<&str>) -> String {
    PromptSections::render(profile, addendum).join()
}

fn render_header(profile: &Profile) -> String {
    let owner = &profile.owner;
    let role = owner
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .unwrap_or(DEFAULT_ROLE);

    match owner.location.as_deref().filter(|l| !l.trim().is_empty()) {
        Some(location) => format!(
            "You are assisting {}, {} based in {}.",
            owner.name, role, location
        ),
        None => format!("You are assisting {}, {}.", owner.name, role),
    }
}

fn render_identity(profile: &Profile) -> String {
    let identity = &profile.identity;
    let mut lines = vec![
        "IDENTITY & EXPERTISE:".to_string(),
        format!("- Bio: {}", identity.bio),
        format!("- Skills: {}", identity.skills.join(", ")),
        format!("- Interests: {}", identity.interests.join(", ")),
    ];

    if let Some(areas) = identity.expertise_areas.as_ref().filter(|a| !a.is_empty()) {
        lines.push(format!("- Expertise areas: {}", areas.join(", ")));
    }

    if let Some(achievements) = identity.achievements.as_ref().filter(|a| !a.is_empty()) {
        lines.push(format!("- Achievements: {}", achievements.join("; ")));
    }

    lines.join("\n")
}

fn render_communication_style(profile: &Profile) -> String {
    let style = &profile.communication_style;

    [
        "COMMUNICATION STYLE:".to_string(),
        format!("- Tone: {}", style.tone),
        format!("- Languages: {}", style.languages.join(", ")),
        format!("- Answers: {}", style.preference("answers")),
        format!("- Code: {}", style.preference("code")),
        format!("- Explanations: {}", style.preference("explanations")),
    ]
    .join("\n")
}

fn render_instructions(profile: &Profile) -> String {
    format!(
        "Use this context to tailor every response to {}'s background, expertise and \
         communication preferences. Do not restate the profile unless asked.",
        profile.owner.name
    )
}
