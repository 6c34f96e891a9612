use crate::TextCompletionProvider;

pub const KEY_POINT_INSTRUCTION: &str =
    "Generate a detailed image prompt for the following key point: ";

/// Prompt used when the LLM could not produce one for `key_point`
pub fn fallback_prompt(key_point: &str) -> String {
    format!("Image for: {key_point}")
}

/// Produces one image prompt per key point, in order.
///
/// A failed or empty completion is replaced by [`fallback_prompt`] so the
/// result always has exactly as many entries as `key_points`.
#[tracing::instrument(skip_all, fields(count = key_points.len()))]
pub async fn generate_prompts<T, S>(llm: &T, key_points: &[S]) -> Vec<String>
where
    T: TextCompletionProvider,
    S: AsRef<str>,
{
    let mut prompts = Vec::with_capacity(key_points.len());

    for key_point in key_points.iter().map(AsRef::as_ref) {
        let instruction = format!("{KEY_POINT_INSTRUCTION}{key_point}");
        let prompt = match llm.complete(&instruction).await {
            Ok(output) if !output.trim().is_empty() => {
                let prompt = output.trim().to_string();
                tracing::info!(%prompt, "Generated prompt");
                prompt
            }
            Ok(_) => {
                tracing::warn!(%key_point, "LLM returned an empty prompt, using fallback");
                fallback_prompt(key_point)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    %key_point,
                    provider = T::PROVIDER_NAME,
                    "Failed to generate prompt, using fallback"
                );
                fallback_prompt(key_point)
            }
        };
        prompts.push(prompt);
    }

    prompts
}
