use std::path::PathBuf;

use crate::{
    analyzer::{ResponseParser, SectionListParser},
    layout::ProjectLayout,
    synthesis::{ImageSynthesisProvider, RenderOptions},
    video::VideoEncoder,
    ReelPipeline, TextCompletionProvider,
};

pub struct ReelPipelineBuilder<T = (), I = (), V = (), P = SectionListParser> {
    layout: ProjectLayout,
    llm: T,
    image_provider: I,
    encoder: V,
    parser: P,
    render_options: RenderOptions,
}

impl ReelPipelineBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ProjectLayout::new(root),
            llm: (),
            image_provider: (),
            encoder: (),
            parser: SectionListParser,
            render_options: RenderOptions::default(),
        }
    }
}

impl<T, I, V, P> ReelPipelineBuilder<T, I, V, P> {
    pub fn llm<T2: TextCompletionProvider>(self, llm: T2) -> ReelPipelineBuilder<T2, I, V, P> {
        ReelPipelineBuilder {
            layout: self.layout,
            llm,
            image_provider: self.image_provider,
            encoder: self.encoder,
            parser: self.parser,
            render_options: self.render_options,
        }
    }

    pub fn image_provider<I2: ImageSynthesisProvider>(
        self,
        image_provider: I2,
    ) -> ReelPipelineBuilder<T, I2, V, P> {
        ReelPipelineBuilder {
            layout: self.layout,
            llm: self.llm,
            image_provider,
            encoder: self.encoder,
            parser: self.parser,
            render_options: self.render_options,
        }
    }

    pub fn encoder<V2: VideoEncoder>(self, encoder: V2) -> ReelPipelineBuilder<T, I, V2, P> {
        ReelPipelineBuilder {
            layout: self.layout,
            llm: self.llm,
            image_provider: self.image_provider,
            encoder,
            parser: self.parser,
            render_options: self.render_options,
        }
    }

    /// Replaces the default [`SectionListParser`]
    pub fn parser<P2: ResponseParser>(self, parser: P2) -> ReelPipelineBuilder<T, I, V, P2> {
        ReelPipelineBuilder {
            layout: self.layout,
            llm: self.llm,
            image_provider: self.image_provider,
            encoder: self.encoder,
            parser,
            render_options: self.render_options,
        }
    }

    pub fn model(mut self, model: Option<String>) -> Self {
        self.render_options.model = model;
        self
    }

    pub fn lora(mut self, lora: Option<String>) -> Self {
        self.render_options.lora = lora;
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.render_options.style = Some(style.into());
        self
    }
}

impl<T, I, V, P> ReelPipelineBuilder<T, I, V, P>
where
    T: TextCompletionProvider,
    I: ImageSynthesisProvider,
    V: VideoEncoder,
    P: ResponseParser,
{
    pub fn build(self) -> ReelPipeline<T, I, V, P> {
        ReelPipeline {
            layout: self.layout,
            llm: self.llm,
            image_provider: self.image_provider,
            encoder: self.encoder,
            parser: self.parser,
            render_options: self.render_options,
        }
    }
}
