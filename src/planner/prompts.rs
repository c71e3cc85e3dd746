//! Prompt templates for the image model
//!
//! Every panel prompt carries the style preset, the brand color, the panel's
//! scene description and the cross-panel consistency block, followed by the
//! product-fusion instruction that ties the generated scene to the reference
//! photo.
use super::ShotContext;
use crate::models::{Panel, ProjectRecord};

/// System message sent with every image request
pub const IMAGE_SYSTEM_PROMPT: &str = "You are an expert at generating high-quality, realistic images based on detailed text descriptions. \
Your output must be a single, detailed image. \
When a user provides a product image, you must seamlessly blend it into the described scene, \
matching lighting, perspective, and context accurately. \
Ensure the product's specific details (logo, color, shape) are preserved. \
Return ONLY the generated image as base64 data, no additional text.";

const FUSION_INSTRUCTION: &str = "CRITICAL INSTRUCTION FOR FUSION: The user will provide a real image of their product. \
Seamlessly integrate this specific product into the scene described above. \
Match the lighting, perspective, and context naturally. \
The product's logo, shape, color, and material properties must be accurately represented as per the provided image. \
Do not generate a generic product; use the provided one.";

fn style_block(record: &ProjectRecord) -> String {
    let preset = record.style.template();
    let mut block = format!(
        "Style: {} ({})\nLighting: {}\nBackground: {}\nMood: {}\n",
        record.style, preset.description, preset.lighting, preset.background, preset.mood
    );
    if let Some(color) = &record.brand_color {
        block.push_str(&format!("Brand color: {}\n", color));
    }
    block
}

/// Generation prompt for a panel's current description
pub fn image_prompt(record: &ProjectRecord, panel: &Panel, ctx: &ShotContext<'_>) -> String {
    format!(
        r#"Generate a high-quality, realistic image in 16:9 aspect ratio based on the following description:

{style}
Scene Description:
{scene}

Consistent Elements (Maintain these strictly):
{consistent}

{fusion}

Please create a detailed, professional image that captures this scene perfectly, adhering to all instructions above."#,
        style = style_block(record),
        scene = panel.scene_description,
        consistent = ctx.consistent_elements(),
        fusion = FUSION_INSTRUCTION,
    )
}

/// Generation prompt for an edit: the current description revised by `instruction`
pub fn edit_prompt(
    record: &ProjectRecord,
    panel: &Panel,
    instruction: &str,
    ctx: &ShotContext<'_>,
) -> String {
    let original = if panel.scene_description.trim().is_empty() {
        "(no prior description)"
    } else {
        panel.scene_description.as_str()
    };

    format!(
        r#"Revise the following image generation prompt based on the instruction, then generate the revised image in 16:9 aspect ratio.
IMPORTANT: Ensure the elements listed under 'Consistent Elements' remain unchanged.

{style}
Original Scene Description:
{original}

Edit Instruction:
{instruction}

Consistent Elements (DO NOT CHANGE):
{consistent}

{fusion}"#,
        style = style_block(record),
        original = original,
        instruction = instruction.trim(),
        consistent = ctx.consistent_elements(),
        fusion = FUSION_INSTRUCTION,
    )
}

/// Scene description stored after a successful edit.
///
/// An empty current description is replaced by the instruction outright.
pub fn revise_description(current: &str, instruction: &str) -> String {
    let current = current.trim();
    let instruction = instruction.trim();
    if current.is_empty() {
        instruction.to_string()
    } else {
        format!("{}\n\nRevision: {}", current, instruction)
    }
}
