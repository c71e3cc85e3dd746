use super::brief::BriefComponents;
use crate::models::{PresetTemplate, ProjectRecord, PANEL_COUNT};

/// Planned content for one panel before any image exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotPlan {
    pub id: u32,
    pub purpose: String,
    pub scene_description: String,
}

/// Inputs shared by every shot in a plan
#[derive(Debug, Clone)]
pub struct ShotContext<'a> {
    pub brief: &'a BriefComponents,
    pub preset: PresetTemplate,
    pub product_type: &'a str,
    pub brand_color: Option<&'a str>,
}

impl ShotContext<'_> {
    /// Brief mood followed by the preset mood
    pub fn combined_mood(&self) -> String {
        format!("{}, {}", self.brief.mood, self.preset.mood)
            .trim_matches(|c| c == ',' || c == ' ')
            .to_string()
    }

    /// Elements every panel must keep identical
    pub fn consistent_elements(&self) -> String {
        let mut elements = format!(
            "{}: specific shape, color, logo visible. \
             Protagonist: unseen or implied presence. \
             Consistent visual style: {}, {}, {}. \
             Maintain consistent aspect ratio (16:9) and camera perspective.",
            title_case(self.product_type),
            self.combined_mood(),
            self.preset.lighting,
            self.preset.background,
        );
        if let Some(color) = self.brand_color {
            elements.push_str(&format!(
                " Brand color {} appears as an accent in props, packaging or set dressing.",
                color
            ));
        }
        elements
    }
}

/// Author the six-shot storyboard plan
pub fn plan_shots(ctx: &ShotContext<'_>) -> Vec<ShotPlan> {
    let product = ctx.product_type;
    let product_title = title_case(product);
    let target = ctx.brief.target.as_str();
    let cta = ctx.brief.cta.as_str();
    let lighting = ctx.preset.lighting;
    let background = ctx.preset.background;
    let mood = ctx.combined_mood();

    let shots = [
        (
            "Establish setting, mood, and introduce the product.",
            format!(
                "Establishing shot for a {}. Setting: {}. Lighting: {}, creating a {} atmosphere. \
                 Product: A {} placed prominently, showing its shape and logo. \
                 Details: Subtle elements suggesting {} context. Camera: Wide shot, 16:9 aspect ratio.",
                ctx.brief.main_idea, background, lighting, mood, product, target
            ),
        ),
        (
            "Show the product in use within the target context.",
            format!(
                "Mid-shot showing the {} using the {}. Action: Holding, wearing, or interacting with the {}. \
                 Setting: Part of the {}. Lighting: {}, emphasizing the texture and details. \
                 Product Details: {} shape, color, and logo clearly visible. Camera: Medium shot, 16:9.",
                target, product, product, background, lighting, product_title
            ),
        ),
        (
            "Highlight a key product feature.",
            format!(
                "Close-up shot focusing on a key feature of the {}. \
                 Example Feature: Logo detail, fabric texture, material quality. \
                 Lighting: {}, highlighting the feature. Product Details: Clear view of the {}'s design. \
                 Setting: Continuation of {}. Camera: Close-up, 16:9.",
                product, lighting, product, background
            ),
        ),
        (
            "Imply social context or lifestyle benefit.",
            format!(
                "Wider lifestyle shot showing the {} benefiting from the {}. \
                 Scene: {} using/wearing the {} in {}. Elements: Contextual items suggesting {} lifestyle. \
                 Lighting: {}, creating an inviting scene. Product: {} visible and integrated naturally. \
                 Camera: Wide/Medium shot, 16:9.",
                target, product, target, product, background, target, lighting, product
            ),
        ),
        (
            "Present the CTA and potentially the product packaging.",
            format!(
                "Flat lay or angled shot of the {}, possibly next to its packaging. \
                 Focus: Product packaging design, prominently displaying the CTA '{}'. \
                 Setting: Clean section of {}. Lighting: {}, ensuring product and text are well-lit. \
                 Product: {} and packaging shown clearly. Text: '{}' visible and readable. \
                 Camera: Top-down or slight angle, 16:9.",
                product, cta, background, lighting, product, cta
            ),
        ),
        (
            "Leave a strong final impression of the brand/product.",
            format!(
                "Artistic or symbolic closing shot. Idea: The {} alone, perhaps with subtle light rays or context. \
                 Mood: Reinforce the {} feeling. Lighting: {}, creating a sense of satisfaction. \
                 Product: Strong, clear view of the {} and its logo. Background: Simplified version of {}. \
                 Camera: Tight composition, 16:9.",
                product, mood, lighting, product, background
            ),
        ),
    ];

    debug_assert_eq!(shots.len(), PANEL_COUNT as usize);

    shots
        .into_iter()
        .enumerate()
        .map(|(index, (purpose, scene_description))| ShotPlan {
            id: index as u32 + 1,
            purpose: purpose.to_string(),
            scene_description,
        })
        .collect()
}

/// Plain-text shot list written next to the exported video
pub fn shot_list(record: &ProjectRecord) -> String {
    let mut out = String::from("--- SpotForge Storyboard Shot List ---\n\n");
    out.push_str(&format!("Brief: {}\n", record.goal));
    out.push_str(&format!("Style: {}\n", record.style));
    if let Some(color) = &record.brand_color {
        out.push_str(&format!("Brand color: {}\n", color));
    }
    out.push('\n');

    for panel in &record.panels {
        out.push_str(&format!("--- Panel {} ---\n", panel.id));
        if !panel.purpose.is_empty() {
            out.push_str(&format!("Goal: {}\n", panel.purpose));
        }
        out.push_str(&format!("Scene: {}\n\n", panel.scene_description));
    }

    out
}

/// Shot list rendered as continuous text for the narration voice
pub fn narration_script(record: &ProjectRecord) -> String {
    record
        .panels
        .iter()
        .map(|panel| {
            let scene = panel.scene_description.trim();
            if scene.ends_with('.') {
                format!("Panel {}. {}", panel.id, scene)
            } else {
                format!("Panel {}. {}.", panel.id, scene)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Capitalise the first letter of every alphabetic run (`t-shirt` → `T-Shirt`)
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
