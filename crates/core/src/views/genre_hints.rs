//! Display hints for genre quick links and genre cards.

use serde::Serialize;

use crate::catalog::Genre;

/// Number of genres offered as quick links.
pub const GENRE_LINK_LIMIT: usize = 12;

/// Icon tag a renderer shows next to a genre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreIcon {
    Bomb,
    Sword,
    Sparkles,
    Laugh,
    Shield,
    #[default]
    Film,
    Tv,
    Heart,
    Wand,
    History,
    Ghost,
    Music,
    Search,
    Rocket,
    Skull,
}

impl GenreIcon {
    /// Icon for a TMDB genre id. Unmapped ids get the default film icon.
    pub fn for_genre(genre_id: u32) -> Self {
        match genre_id {
            28 => GenreIcon::Bomb,       // Action
            12 => GenreIcon::Sword,      // Adventure
            16 => GenreIcon::Sparkles,   // Animation
            35 => GenreIcon::Laugh,      // Comedy
            80 => GenreIcon::Shield,     // Crime
            99 => GenreIcon::Film,       // Documentary
            18 => GenreIcon::Tv,         // Drama
            10751 => GenreIcon::Heart,   // Family
            14 => GenreIcon::Wand,       // Fantasy
            36 => GenreIcon::History,    // History
            27 => GenreIcon::Ghost,      // Horror
            10402 => GenreIcon::Music,   // Music
            9648 => GenreIcon::Search,   // Mystery
            10749 => GenreIcon::Heart,   // Romance
            878 => GenreIcon::Rocket,    // Science Fiction
            53 => GenreIcon::Skull,      // Thriller
            10752 => GenreIcon::Bomb,    // War
            37 => GenreIcon::Sword,      // Western
            _ => GenreIcon::default(),
        }
    }
}

/// Gradient a renderer paints behind a genre card, named by its two hues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreTint {
    RedOrange,
    EmeraldGreen,
    PinkPurple,
    YellowAmber,
    SlateGray,
    BlueCyan,
    VioletPurple,
    PinkRose,
    IndigoBlue,
    AmberYellow,
    GraySlate,
    FuchsiaPink,
    TealCyan,
    RosePink,
    CyanBlue,
    RedRose,
    StoneGray,
    OrangeAmber,
    /// Theme colours, for genres without their own tint.
    #[default]
    Primary,
}

impl GenreTint {
    pub fn for_genre(genre_id: u32) -> Self {
        match genre_id {
            28 => GenreTint::RedOrange,
            12 => GenreTint::EmeraldGreen,
            16 => GenreTint::PinkPurple,
            35 => GenreTint::YellowAmber,
            80 => GenreTint::SlateGray,
            99 => GenreTint::BlueCyan,
            18 => GenreTint::VioletPurple,
            10751 => GenreTint::PinkRose,
            14 => GenreTint::IndigoBlue,
            36 => GenreTint::AmberYellow,
            27 => GenreTint::GraySlate,
            10402 => GenreTint::FuchsiaPink,
            9648 => GenreTint::TealCyan,
            10749 => GenreTint::RosePink,
            878 => GenreTint::CyanBlue,
            53 => GenreTint::RedRose,
            10752 => GenreTint::StoneGray,
            37 => GenreTint::OrangeAmber,
            _ => GenreTint::default(),
        }
    }
}

/// A link to a single-genre screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreLink {
    pub genre_id: u32,
    pub name: String,
    pub icon: GenreIcon,
    pub path: String,
}

impl From<&Genre> for GenreLink {
    fn from(genre: &Genre) -> Self {
        Self {
            genre_id: genre.id,
            name: genre.name.clone(),
            icon: GenreIcon::for_genre(genre.id),
            path: format!("/genre/{}", genre.id),
        }
    }
}

/// Quick links for the first [`GENRE_LINK_LIMIT`] genres, in list order.
pub fn genre_links(genres: &[Genre]) -> Vec<GenreLink> {
    genres
        .iter()
        .take(GENRE_LINK_LIMIT)
        .map(GenreLink::from)
        .collect()
}
