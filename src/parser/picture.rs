//! Embedded picture extraction.
//!
//! `\pict` destinations carry their payload as hex text. The collector
//! accumulates it while the picture is open and decodes it when the group
//! closes; only bytes with a known image signature become images.
//!
//! Word writes each picture twice: a `\shppict` group with the modern copy
//! and a `\nonshppict` group with a WMF/EMF fallback for old readers. The two
//! groups form one figure, and the fallback is dropped when the figure
//! already has a raster image.

use crate::detect::detect_image_format;
use crate::error::{Error, Result};
use crate::model::EmbeddedImage;

use super::options::ParseOptions;
use super::tokenizer::Token;

#[derive(Debug, Default)]
struct PendingPicture {
    hex: String,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FigureState {
    /// Inside the `\shppict` group opened at this depth
    Primary(usize),
    /// `\shppict` closed; a `\nonshppict` may follow
    Awaiting,
    /// Inside the `\nonshppict` group opened at this depth
    Fallback(usize),
}

#[derive(Debug)]
struct Figure {
    state: FigureState,
    images: Vec<EmbeddedImage>,
}

/// Collects pictures from the token stream.
#[derive(Debug)]
pub struct PictureCollector {
    enabled: bool,
    current: Option<PendingPicture>,
    figure: Option<Figure>,
    images: Vec<EmbeddedImage>,
    discarded: usize,
}

impl PictureCollector {
    /// Create a collector; a disabled collector ignores all pictures.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: None,
            figure: None,
            images: Vec::new(),
            discarded: 0,
        }
    }

    /// `\shppict` seen at the given group depth.
    pub fn begin_figure(&mut self, depth: usize) {
        self.commit_figure();
        self.figure = Some(Figure {
            state: FigureState::Primary(depth),
            images: Vec::new(),
        });
    }

    /// `\nonshppict` seen at the given group depth.
    pub fn begin_fallback(&mut self, depth: usize) {
        match self.figure.as_mut() {
            Some(figure) if figure.state == FigureState::Awaiting => {
                figure.state = FigureState::Fallback(depth);
            }
            _ => {
                self.commit_figure();
                self.figure = Some(Figure {
                    state: FigureState::Fallback(depth),
                    images: Vec::new(),
                });
            }
        }
    }

    /// `\pict` seen: start accumulating a new payload.
    pub fn start_picture(&mut self) {
        if self.enabled {
            self.current = Some(PendingPicture::default());
        }
    }

    /// Whether a picture payload is being accumulated.
    pub fn is_collecting(&self) -> bool {
        self.current.is_some()
    }

    /// Control word inside a picture destination.
    pub fn on_control_word(&mut self, token: &Token) {
        let Some(picture) = self.current.as_mut() else {
            return;
        };
        let value = token.param.and_then(|p| u32::try_from(p).ok());
        match token.text.as_str() {
            "picw" => picture.width = value,
            "pich" => picture.height = value,
            "bin" => log::debug!("Raw \\bin picture data is not supported"),
            _ => {}
        }
    }

    /// Text inside a picture destination.
    pub fn push_hex(&mut self, text: &str) {
        if let Some(picture) = self.current.as_mut() {
            picture
                .hex
                .extend(text.chars().filter(|c| !c.is_whitespace()));
        }
    }

    /// The picture group closed. `position` is the number of elements
    /// emitted so far.
    pub fn finish_picture(&mut self, position: usize, options: &ParseOptions) -> Result<()> {
        let Some(picture) = self.current.take() else {
            return Ok(());
        };
        if options.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let Some(image) = self.decode(picture, position) else {
            self.discarded += 1;
            return Ok(());
        };

        match self.figure.as_mut() {
            Some(figure) if figure.state != FigureState::Awaiting => figure.images.push(image),
            _ => {
                self.commit_figure();
                self.images.push(image);
            }
        }
        Ok(())
    }

    /// A group closed; `depth` is the depth after closing.
    pub fn group_closed(&mut self, depth: usize) {
        let Some(figure) = self.figure.as_mut() else {
            return;
        };
        match figure.state {
            FigureState::Primary(open) if depth < open => figure.state = FigureState::Awaiting,
            FigureState::Fallback(open) if depth < open => self.commit_figure(),
            _ => {}
        }
    }

    /// Content arrived after a figure; no fallback follows.
    pub fn settle(&mut self) {
        if matches!(
            self.figure,
            Some(Figure {
                state: FigureState::Awaiting,
                ..
            })
        ) {
            self.commit_figure();
        }
    }

    /// End of input: discard an unterminated picture and commit open figures.
    pub fn abandon(&mut self) {
        if let Some(picture) = self.current.take() {
            log::warn!(
                "Discarding unterminated picture ({} hex digits)",
                picture.hex.len()
            );
            self.discarded += 1;
        }
        self.commit_figure();
    }

    /// Pictures kept so far.
    pub fn extracted(&self) -> usize {
        self.images.len()
    }

    /// Pictures dropped so far.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Finish and return the kept images.
    pub fn into_images(mut self) -> Vec<EmbeddedImage> {
        self.abandon();
        self.images
    }

    fn decode(&self, picture: PendingPicture, position: usize) -> Option<EmbeddedImage> {
        if picture.hex.is_empty() {
            log::debug!("Picture has no payload");
            return None;
        }
        if picture.hex.len() % 2 != 0 {
            log::warn!(
                "Discarding picture with odd-length hex data ({} digits)",
                picture.hex.len()
            );
            return None;
        }
        let bytes = match hex::decode(&picture.hex) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("Discarding picture with invalid hex data: {}", e);
                return None;
            }
        };
        let Some(format) = detect_image_format(&bytes) else {
            log::debug!("Discarding picture with unknown signature ({} bytes)", bytes.len());
            return None;
        };

        Some(EmbeddedImage::new(bytes, format, position).with_dimensions(picture.width, picture.height))
    }

    fn commit_figure(&mut self) {
        let Some(figure) = self.figure.take() else {
            return;
        };
        let has_raster = figure
            .images
            .iter()
            .any(|image| !image.format.is_legacy_vector());
        for image in figure.images {
            if has_raster && image.format.is_legacy_vector() {
                log::debug!("Dropping {} fallback of a raster picture", image.format);
                self.discarded += 1;
            } else {
                self.images.push(image);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageFormat;

    const PNG_HEX: &str = "89504e470d0a1a0a0000000d49484452";
    const WMF_HEX: &str = "d7cdc69a0000000000000000";

    fn picture(collector: &mut PictureCollector, hex: &str, position: usize) {
        collector.start_picture();
        collector.push_hex(hex);
        collector.finish_picture(position, &ParseOptions::default()).unwrap();
    }

    #[test]
    fn test_png_is_kept() {
        let mut collector = PictureCollector::new(true);
        collector.start_picture();
        collector.on_control_word(&Token::control_word("picw", Some(64)));
        collector.push_hex("89504e47 0d0a1a0a");
        collector.push_hex("0000000d49484452");
        collector.finish_picture(2, &ParseOptions::default()).unwrap();

        let images = collector.into_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].format, ImageFormat::Png);
        assert_eq!(images[0].width, Some(64));
        assert_eq!(images[0].position, 2);
        assert_eq!(&images[0].data[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_bad_payloads_are_discarded() {
        let mut collector = PictureCollector::new(true);
        picture(&mut collector, "0011223344", 0);
        picture(&mut collector, "89504", 0);
        picture(&mut collector, "zz", 0);
        picture(&mut collector, "", 0);
        assert_eq!(collector.discarded(), 4);
        assert!(collector.into_images().is_empty());
    }

    #[test]
    fn test_figure_drops_legacy_fallback() {
        let mut collector = PictureCollector::new(true);
        collector.begin_figure(2);
        picture(&mut collector, PNG_HEX, 0);
        collector.group_closed(1);
        collector.begin_fallback(2);
        picture(&mut collector, WMF_HEX, 0);
        collector.group_closed(1);

        assert_eq!(collector.discarded(), 1);
        let images = collector.into_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].format, ImageFormat::Png);
    }

    #[test]
    fn test_lone_fallback_is_kept() {
        let mut collector = PictureCollector::new(true);
        collector.begin_fallback(2);
        picture(&mut collector, WMF_HEX, 0);
        collector.group_closed(1);
        let images = collector.into_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].format, ImageFormat::Wmf);
    }

    #[test]
    fn test_settle_commits_awaiting_figure() {
        let mut collector = PictureCollector::new(true);
        collector.begin_figure(2);
        picture(&mut collector, PNG_HEX, 0);
        collector.group_closed(1);
        collector.settle();
        assert_eq!(collector.extracted(), 1);
    }

    #[test]
    fn test_unterminated_picture_is_discarded() {
        let mut collector = PictureCollector::new(true);
        collector.start_picture();
        collector.push_hex(PNG_HEX);
        collector.abandon();
        assert_eq!(collector.discarded(), 1);
        assert!(collector.into_images().is_empty());
    }

    #[test]
    fn test_disabled_collector_ignores_pictures() {
        let mut collector = PictureCollector::new(false);
        picture(&mut collector, PNG_HEX, 0);
        assert!(!collector.is_collecting());
        assert!(collector.into_images().is_empty());
    }

    #[test]
    fn test_cancelled_decode() {
        let flag = crate::parser::CancellationFlag::new();
        flag.cancel();
        let options = ParseOptions::new().with_cancellation(flag);
        let mut collector = PictureCollector::new(true);
        collector.start_picture();
        collector.push_hex(PNG_HEX);
        assert!(matches!(
            collector.finish_picture(0, &options),
            Err(Error::Cancelled)
        ));
    }
}
