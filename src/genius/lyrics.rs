use scraper::{ElementRef, Html, Node, Selector};

use crate::{
    client::send_text,
    errors::{Provider, ProviderError},
};

use super::GeniusClient;

/// Lyric containers, oldest page layout first.
const LYRIC_SELECTORS: [&str; 2] = ["div.lyrics", "div[data-lyrics-container='true']"];

impl GeniusClient {
    /// Downloads a song page and extracts its lyrics.
    ///
    /// The page itself is public, so no bearer token is sent.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Empty`] when the page has no lyric container with
    /// text in it.
    pub async fn fetch_lyrics(&self, song_url: &str) -> Result<String, ProviderError> {
        let html = send_text(Provider::Genius, self.http.get(song_url)).await?;
        extract_lyrics(&html).ok_or_else(|| ProviderError::Empty {
            provider: Provider::Genius,
            what: format!("lyrics at {}", song_url),
        })
    }
}

/// Pulls the lyric text out of a Genius song page.
///
/// Tries each selector in [`LYRIC_SELECTORS`] and uses the first one that
/// matches. Text of all matching containers is concatenated, `<br>` becomes
/// a line break and containers are separated by a line break.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for raw in LYRIC_SELECTORS {
        let Ok(selector) = Selector::parse(raw) else {
            continue;
        };

        let mut lyrics = String::new();
        let mut found = false;
        for container in document.select(&selector) {
            found = true;
            push_text(container, &mut lyrics);
            lyrics.push('\n');
        }

        let lyrics = lyrics.trim();
        if found && !lyrics.is_empty() {
            return Some(lyrics.to_string());
        }
    }

    None
}

fn push_text(container: ElementRef<'_>, out: &mut String) {
    for node in container.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_layout() {
        let html = r#"<html><body><div class="lyrics"><p>Line one<br>Line two</p></div></body></html>"#;
        assert_eq!(extract_lyrics(html).as_deref(), Some("Line one\nLine two"));
    }

    #[test]
    fn container_layout_joins_blocks() {
        let html = r#"<html><body>
            <div data-lyrics-container="true">[Verse 1]<br><a href="/x"><span>Hello</span></a> world</div>
            <div data-lyrics-container="true">Second block</div>
        </body></html>"#;
        assert_eq!(
            extract_lyrics(html).as_deref(),
            Some("[Verse 1]\nHello world\nSecond block")
        );
    }

    #[test]
    fn page_without_lyrics() {
        assert_eq!(extract_lyrics("<html><body><div>nothing</div></body></html>"), None);
        assert_eq!(extract_lyrics(r#"<div class="lyrics">   </div>"#), None);
    }
}
