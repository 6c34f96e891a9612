pub mod builder;

use std::path::{Path, PathBuf};

use crate::{
    analyzer::{analyze_script, ResponseParser, ScriptAnalysis},
    enhance::enhance_image,
    layout::ProjectLayout,
    prompt::generate_prompts,
    synthesis::{generate_image, ImageSynthesisProvider, RenderOptions},
    video::{assemble_video, VideoEncoder},
    Error, TextCompletionProvider,
};

/// Everything the user is asked to approve before images are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storyboard {
    pub key_points: Vec<String>,
    pub characters: Vec<String>,
    pub prompts: Vec<String>,
}

/// An image the synthesis API produced for the `index`th prompt (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub index: usize,
    pub prompt: String,
    pub path: PathBuf,
}

/// Stage updates reported while a run is rendering and assembling
#[derive(Debug)]
pub enum Progress<'a> {
    Rendering { index: usize, total: usize },
    Rendered(&'a GeneratedImage),
    Skipped { index: usize, total: usize, error: &'a Error },
    Assembling { images: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { video: PathBuf, images: Vec<PathBuf> },
    Cancelled,
}

/// Script + narration to video, one stage after another
#[derive(Debug)]
pub struct ReelPipeline<T, I, V, P>
where
    T: TextCompletionProvider,
    I: ImageSynthesisProvider,
    V: VideoEncoder,
    P: ResponseParser,
{
    layout: ProjectLayout,
    llm: T,
    image_provider: I,
    encoder: V,
    parser: P,
    render_options: RenderOptions,
}

impl<T, I, V, P> ReelPipeline<T, I, V, P>
where
    T: TextCompletionProvider,
    I: ImageSynthesisProvider,
    V: VideoEncoder,
    P: ResponseParser,
{
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    pub async fn analyze(&self, script_path: &Path) -> ScriptAnalysis {
        analyze_script(&self.llm, &self.parser, script_path).await
    }

    /// Analyses the script and generates one prompt per key point
    #[tracing::instrument(skip(self))]
    pub async fn storyboard(&self, script_path: &Path) -> Result<Storyboard, Error> {
        let ScriptAnalysis {
            key_points,
            characters,
        } = self.analyze(script_path).await;

        if key_points.is_empty() {
            tracing::error!("No key points extracted from the script");
            return Err(Error::NoKeyPoints);
        }
        if characters.is_empty() {
            tracing::warn!("No characters extracted, proceeding without character consistency");
        }

        let prompts = generate_prompts(&self.llm, &key_points).await;

        Ok(Storyboard {
            key_points,
            characters,
            prompts,
        })
    }

    /// Renders and enhances an image per prompt. Failed renders are skipped;
    /// the returned paths keep prompt order.
    #[tracing::instrument(skip_all, fields(prompts = prompts.len()))]
    pub async fn render_images<F>(
        &self,
        prompts: &[String],
        on_progress: &mut F,
    ) -> Result<Vec<PathBuf>, Error>
    where
        F: FnMut(Progress<'_>),
    {
        tokio::fs::create_dir_all(self.layout.images_dir()).await?;

        let total = prompts.len();
        let mut generated = Vec::with_capacity(total);
        for (index, prompt) in (1..).zip(prompts) {
            let path = self.layout.image_path(index);
            tracing::info!(index, total, "Generating image");
            on_progress(Progress::Rendering { index, total });

            match generate_image(&self.image_provider, prompt, &self.render_options, &path).await {
                Ok(()) => {
                    let image = GeneratedImage {
                        index,
                        prompt: prompt.clone(),
                        path,
                    };
                    on_progress(Progress::Rendered(&image));
                    generated.push(image);
                }
                Err(e) => {
                    tracing::error!(error = %e, index, %prompt, "Failed to generate image, skipping");
                    on_progress(Progress::Skipped {
                        index,
                        total,
                        error: &e,
                    });
                }
            }
        }

        let enhanced = generated
            .iter()
            .map(|image| enhance_image(&image.path, &self.layout.enhanced_image_path(image.index)))
            .collect::<Vec<_>>();

        tracing::info!(
            succeeded = enhanced.len(),
            failed = prompts.len() - enhanced.len(),
            "Image generation finished"
        );
        Ok(enhanced)
    }

    pub async fn assemble(&self, images: &[PathBuf], audio_path: &Path) -> Result<PathBuf, Error> {
        tokio::fs::create_dir_all(self.layout.videos_dir()).await?;
        assemble_video(&self.encoder, images, audio_path, &self.layout.video_path())
    }

    /// Runs the whole pipeline. `approve` sees the storyboard before any
    /// image is requested; returning `false` cancels the run.
    pub async fn run<F>(
        &self,
        script_path: &Path,
        audio_path: &Path,
        approve: F,
    ) -> Result<RunOutcome, Error>
    where
        F: FnOnce(&Storyboard) -> bool,
    {
        self.run_with_progress(script_path, audio_path, approve, |_| {})
            .await
    }

    /// Same as [`ReelPipeline::run`], reporting each render and the start of
    /// assembly to `on_progress`
    #[tracing::instrument(skip(self, approve, on_progress))]
    pub async fn run_with_progress<F, G>(
        &self,
        script_path: &Path,
        audio_path: &Path,
        approve: F,
        mut on_progress: G,
    ) -> Result<RunOutcome, Error>
    where
        F: FnOnce(&Storyboard) -> bool,
        G: FnMut(Progress<'_>),
    {
        let storyboard = self.storyboard(script_path).await?;

        if !approve(&storyboard) {
            tracing::info!("Run cancelled at approval");
            return Ok(RunOutcome::Cancelled);
        }

        let images = self
            .render_images(&storyboard.prompts, &mut on_progress)
            .await?;
        if images.is_empty() {
            tracing::error!("No images were successfully generated");
            return Err(Error::NoImages);
        }

        on_progress(Progress::Assembling {
            images: images.len(),
        });
        let video = self.assemble(&images, audio_path).await?;

        Ok(RunOutcome::Completed { video, images })
    }
}
