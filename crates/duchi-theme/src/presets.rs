//! Built-in preset themes
//!
//! The tables are transcribed from the daisyUI design tokens the site ships
//! with, one value per [`ColorRole`] in canonical order.

use crate::colors::{ColorRole, ThemeColorSet};
use std::fmt;
use std::str::FromStr;

/// A read-only named palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetTheme {
    Light,
    Dark,
    Retro,
    Emerald,
    Valentine,
    Forest,
}

/// Preset that user themes are layered over
pub const BASE_PRESET: PresetTheme = PresetTheme::Light;

impl PresetTheme {
    pub const ALL: [PresetTheme; 6] = [
        PresetTheme::Light,
        PresetTheme::Dark,
        PresetTheme::Retro,
        PresetTheme::Emerald,
        PresetTheme::Valentine,
        PresetTheme::Forest,
    ];

    /// Selector / `data-theme` value
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetTheme::Light => "light",
            PresetTheme::Dark => "dark",
            PresetTheme::Retro => "retro",
            PresetTheme::Emerald => "emerald",
            PresetTheme::Valentine => "valentine",
            PresetTheme::Forest => "forest",
        }
    }

    /// Capitalized name, used as the editor's theme name
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Match a selector exactly
    pub fn from_name(name: &str) -> Option<PresetTheme> {
        PresetTheme::ALL
            .into_iter()
            .find(|preset| preset.as_str() == name)
    }

    /// The full color table of the preset
    pub fn colors(&self) -> ThemeColorSet {
        ColorRole::ALL.into_iter().zip(self.table()).collect()
    }

    fn table(&self) -> [&'static str; 20] {
        match self {
            PresetTheme::Light => LIGHT,
            PresetTheme::Dark => DARK,
            PresetTheme::Retro => RETRO,
            PresetTheme::Emerald => EMERALD,
            PresetTheme::Valentine => VALENTINE,
            PresetTheme::Forest => FOREST,
        }
    }
}

impl fmt::Display for PresetTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetTheme::from_name(s).ok_or_else(|| format!("unknown preset theme: {}", s))
    }
}

const LIGHT: [&str; 20] = [
    "oklch(45% 0.24 277.023)",
    "oklch(93% 0.034 272.788)",
    "oklch(65% 0.241 354.308)",
    "oklch(94% 0.028 342.258)",
    "oklch(77% 0.152 181.912)",
    "oklch(38% 0.063 188.416)",
    "oklch(14% 0.005 285.823)",
    "oklch(92% 0.004 286.32)",
    "oklch(100% 0 0)",
    "oklch(98% 0 0)",
    "oklch(95% 0 0)",
    "oklch(21% 0.006 285.885)",
    "oklch(74% 0.16 232.661)",
    "oklch(29% 0.066 243.157)",
    "oklch(76% 0.177 163.223)",
    "oklch(37% 0.077 168.94)",
    "oklch(82% 0.189 84.429)",
    "oklch(41% 0.112 45.904)",
    "oklch(71% 0.194 13.428)",
    "oklch(27% 0.105 12.094)",
];

const DARK: [&str; 20] = [
    "oklch(58% 0.233 277.117)",
    "oklch(96% 0.018 272.314)",
    "oklch(65% 0.241 354.308)",
    "oklch(94% 0.028 342.258)",
    "oklch(77% 0.152 181.912)",
    "oklch(38% 0.063 188.416)",
    "oklch(14% 0.005 285.823)",
    "oklch(92% 0.004 286.32)",
    "oklch(25.33% 0.016 252.42)",
    "oklch(23.26% 0.014 253.1)",
    "oklch(21.15% 0.012 254.09)",
    "oklch(97.807% 0.029 256.847)",
    "oklch(74% 0.16 232.661)",
    "oklch(29% 0.066 243.157)",
    "oklch(76% 0.177 163.223)",
    "oklch(37% 0.077 168.94)",
    "oklch(82% 0.189 84.429)",
    "oklch(41% 0.112 45.904)",
    "oklch(71% 0.194 13.428)",
    "oklch(27% 0.105 12.094)",
];

const RETRO: [&str; 20] = [
    "oklch(80% 0.114 19.571)",
    "oklch(39% 0.141 25.723)",
    "oklch(92% 0.084 155.995)",
    "oklch(44% 0.119 151.328)",
    "oklch(68% 0.162 75.834)",
    "oklch(41% 0.112 45.904)",
    "oklch(44% 0.011 73.639)",
    "oklch(86% 0.005 56.366)",
    "oklch(91.637% 0.034 90.515)",
    "oklch(88.272% 0.049 91.774)",
    "oklch(84.133% 0.065 90.856)",
    "oklch(41% 0.112 45.904)",
    "oklch(58% 0.158 241.966)",
    "oklch(96% 0.059 95.617)",
    "oklch(51% 0.096 186.391)",
    "oklch(96% 0.059 95.617)",
    "oklch(64% 0.222 41.116)",
    "oklch(96% 0.059 95.617)",
    "oklch(70% 0.191 22.216)",
    "oklch(40% 0.123 38.172)",
];

const EMERALD: [&str; 20] = [
    "oklch(76.662% 0.135 153.45)",
    "oklch(33.387% 0.04 162.24)",
    "oklch(61.302% 0.202 261.294)",
    "oklch(100% 0 0)",
    "oklch(72.772% 0.149 33.2)",
    "oklch(0% 0 0)",
    "oklch(35.519% 0.032 262.988)",
    "oklch(98.462% 0.001 247.838)",
    "oklch(100% 0 0)",
    "oklch(93% 0 0)",
    "oklch(86% 0 0)",
    "oklch(35.519% 0.032 262.988)",
    "oklch(72.06% 0.191 231.6)",
    "oklch(0% 0 0)",
    "oklch(64.8% 0.15 160)",
    "oklch(0% 0 0)",
    "oklch(84.71% 0.199 83.87)",
    "oklch(0% 0 0)",
    "oklch(71.76% 0.221 22.18)",
    "oklch(0% 0 0)",
];

const VALENTINE: [&str; 20] = [
    "oklch(65% 0.241 354.308)",
    "oklch(100% 0 0)",
    "oklch(62% 0.265 303.9)",
    "oklch(97% 0.014 308.299)",
    "oklch(82% 0.111 230.318)",
    "oklch(39% 0.09 240.876)",
    "oklch(40% 0.153 2.432)",
    "oklch(89% 0.061 343.231)",
    "oklch(97% 0.014 343.198)",
    "oklch(94% 0.028 342.258)",
    "oklch(89% 0.061 343.231)",
    "oklch(52% 0.223 3.958)",
    "oklch(86% 0.127 207.078)",
    "oklch(44% 0.11 240.79)",
    "oklch(84% 0.143 164.978)",
    "oklch(43% 0.095 166.913)",
    "oklch(75% 0.183 55.934)",
    "oklch(26% 0.079 36.259)",
    "oklch(63% 0.237 25.331)",
    "oklch(97% 0.013 17.38)",
];

const FOREST: [&str; 20] = [
    "oklch(68.628% 0.185 148.958)",
    "oklch(0% 0 0)",
    "oklch(69.776% 0.135 168.327)",
    "oklch(13.955% 0.027 168.327)",
    "oklch(70.628% 0.119 185.713)",
    "oklch(14.125% 0.023 185.713)",
    "oklch(30.698% 0.039 171.364)",
    "oklch(86.139% 0.007 171.364)",
    "oklch(20.84% 0.008 17.911)",
    "oklch(18.522% 0.007 17.911)",
    "oklch(16.203% 0.007 17.911)",
    "oklch(83.768% 0.001 17.911)",
    "oklch(72.06% 0.191 231.6)",
    "oklch(0% 0 0)",
    "oklch(64.8% 0.15 160)",
    "oklch(0% 0 0)",
    "oklch(84.71% 0.199 83.87)",
    "oklch(0% 0 0)",
    "oklch(71.76% 0.221 22.18)",
    "oklch(0% 0 0)",
];
