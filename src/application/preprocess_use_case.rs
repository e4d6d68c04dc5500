// ============================================================
// Layer 2 - Preprocess Use Case
// ============================================================
// The offline cleaning pass: mirror the raw tree into the clean
// tree, drop everything that is not a decodable image, and print
// the per-class retention summary.
//
// Runs independently of training; `train` reads whatever the
// last cleaning pass left behind.

use anyhow::Result;

use crate::data::sanitizer::sanitize;
use crate::domain::layout::DataLayout;

pub struct PreprocessUseCase {
    layout: DataLayout,
}

impl PreprocessUseCase {
    pub fn new(layout: DataLayout) -> Self {
        Self { layout }
    }

    pub fn execute(&self) -> Result<()> {
        tracing::info!(
            "Sanitizing '{}' into '{}'",
            self.layout.raw_dir.display(),
            self.layout.cleaned_dir.display()
        );

        let report = sanitize(&self.layout.raw_dir, &self.layout.cleaned_dir)?;

        println!("\nResult of cleaning:");
        for entry in &report {
            println!("    {}/{} remaining in {}", entry.kept, entry.raw, entry.class);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs;

    #[test]
    fn test_cleaned_tree_mirrors_raw_classes() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout {
            raw_dir:     dir.path().join("raw"),
            cleaned_dir: dir.path().join("cleaned"),
            model_dir:   dir.path().join("models"),
            plot_dir:    dir.path().join("plots"),
        };

        let apple = layout.raw_dir.join("apple");
        fs::create_dir_all(&apple).unwrap();
        RgbImage::from_fn(6, 6, |x, y| image::Rgb([x as u8, y as u8, 9]))
            .save(apple.join("ok.png"))
            .unwrap();
        fs::write(apple.join("junk.png"), b"junk").unwrap();

        PreprocessUseCase::new(layout.clone()).execute().unwrap();

        assert!(layout.cleaned_dir.join("apple/ok.png").is_file());
        assert!(!layout.cleaned_dir.join("apple/junk.png").exists());
        assert!(layout.raw_dir.join("apple/junk.png").is_file());
    }
}
