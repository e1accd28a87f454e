//! One-shot translation and classification.

use crate::context::AppContext;
use anyhow::{Result, anyhow};
use lingo_core::language::{LanguageClassifier, is_purely_numeric, is_time_format};
use lingo_core::message::SkipReason;
use lingo_core::translation::{Lang, LanguagePair, TranslationRequest, TranslationService};

/// Picks the direction for `text`, or the reason it would be skipped.
fn resolve_pair(
    classifier: &LanguageClassifier,
    text: &str,
    from: Option<Lang>,
    to: Option<Lang>,
) -> std::result::Result<LanguagePair, SkipReason> {
    match (from, to) {
        (Some(source), Some(target)) if source == target => Err(SkipReason::NoResult),
        (Some(source), Some(target)) => Ok(LanguagePair::new(source, target)),
        (Some(source), None) => Ok(LanguagePair::new(source, other(source))),
        (None, Some(target)) => Ok(LanguagePair::new(other(target), target)),
        (None, None) => classify(classifier, text),
    }
}

fn other(lang: Lang) -> Lang {
    match lang {
        Lang::En => Lang::Zh,
        Lang::Zh => Lang::En,
    }
}

fn classify(classifier: &LanguageClassifier, text: &str) -> std::result::Result<LanguagePair, SkipReason> {
    if is_time_format(text) || is_purely_numeric(text) {
        return Err(SkipReason::TimeFormat);
    }
    classifier
        .classify(text)
        .ok_or(SkipReason::LanguageUndetermined)
}

pub async fn translate(
    ctx: &AppContext,
    text: &str,
    from: Option<Lang>,
    to: Option<Lang>,
) -> Result<()> {
    let classifier = LanguageClassifier::new(ctx.config.chinese_ratio_threshold);
    let pair = resolve_pair(&classifier, text, from, to)
        .map_err(|reason| anyhow!("Nothing to translate ({})", reason))?;
    let request =
        TranslationRequest::new(text.trim(), pair).ok_or_else(|| anyhow!("Text is empty"))?;

    ctx.session.restore().await?;
    if !ctx.session.is_authorized() {
        return Err(anyhow!("Not authorized. Run `lingo activate <CODE>` first"));
    }

    tracing::info!(%pair, "[Cli] Translating");
    let session = ctx.session.current();
    match ctx.backend.translate(&request, &session).await {
        Ok(translated) => {
            println!("{}", translated);
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            ctx.session.invalidate().await?;
            Err(anyhow!("Authorization expired or revoked. Please activate again"))
        }
        Err(e) => Err(anyhow!("Translation failed: {}", e)),
    }
}

pub fn classify_text(ctx: &AppContext, text: &str) -> Result<()> {
    let classifier = LanguageClassifier::new(ctx.config.chinese_ratio_threshold);
    match classify(&classifier, text.trim()) {
        Ok(pair) => println!("{}", pair),
        Err(reason) => println!("skip: {}", reason),
    }
    Ok(())
}
