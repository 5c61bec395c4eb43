//! Native command-line overrides.

use clap::Parser;

use crate::scene::SceneConfig;
use crate::title::TitleConfig;

/// Flags parsed from the command line.
#[derive(Parser, Debug, Clone)]
#[command(name = "saber-clash")]
#[command(about = "Looping saber clash title sequence", long_about = None)]
pub struct Cli {
    /// Title font asset path, relative to the assets directory
    #[arg(long)]
    pub font: Option<String>,

    /// Seed for starfield placement
    #[arg(long)]
    pub star_seed: Option<u64>,

    /// Open the world inspector window
    #[arg(long)]
    pub inspect: bool,
}

impl Cli {
    /// Writes the overrides that were given onto the default configs.
    pub fn apply(&self, scene: &mut SceneConfig, title: &mut TitleConfig) {
        if let Some(font) = &self.font {
            title.font_path.clone_from(font);
        }
        if let Some(seed) = self.star_seed {
            scene.starfield.seed = seed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["saber-clash"]).unwrap();
        let mut scene = SceneConfig::default();
        let mut title = TitleConfig::default();
        cli.apply(&mut scene, &mut title);
        assert_eq!(scene.starfield.seed, SceneConfig::default().starfield.seed);
        assert_eq!(title.font_path, TitleConfig::default().font_path);
        assert!(!cli.inspect);
    }

    #[test]
    fn flags_override_configs() {
        let cli = Cli::try_parse_from([
            "saber-clash",
            "--font",
            "fonts/other.ttf",
            "--star-seed",
            "42",
            "--inspect",
        ])
        .unwrap();
        let mut scene = SceneConfig::default();
        let mut title = TitleConfig::default();
        cli.apply(&mut scene, &mut title);
        assert_eq!(scene.starfield.seed, 42);
        assert_eq!(title.font_path, "fonts/other.ttf");
        assert!(cli.inspect);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["saber-clash", "--loud"]).is_err());
    }
}
