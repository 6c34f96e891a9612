use std::{fmt::Display, future::Future};

/// Something that turns a single instruction into free-form text
pub trait TextCompletionProvider {
    const PROVIDER_NAME: &'static str;

    type Error: Display;

    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>>;
}

impl<T: TextCompletionProvider> TextCompletionProvider for &T {
    const PROVIDER_NAME: &'static str = T::PROVIDER_NAME;

    type Error = T::Error;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).complete(prompt).await
    }
}
