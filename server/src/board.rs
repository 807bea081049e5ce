//! Static board definitions used to seed new games.

use clap::ValueEnum;
use shared::{Territory, TerritoryId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BoardVariant {
    /// Four South American territories.
    #[default]
    Demo,
    /// The classic 42-territory world map.
    Classic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no territories")]
    Empty,
    #[error("territory id {0} is defined more than once")]
    DuplicateId(TerritoryId),
    #[error("territory {from} lists unknown neighbour {to}")]
    UnknownNeighbour { from: TerritoryId, to: TerritoryId },
}

/// Read-only catalog of territories for one board variant.
#[derive(Debug, Clone)]
pub struct BoardCatalog {
    /// `None` for boards supplied by the caller.
    variant: Option<BoardVariant>,
    territories: Vec<Territory>,
}

impl BoardCatalog {
    pub fn new(variant: BoardVariant) -> Self {
        let territories = match variant {
            BoardVariant::Demo => demo_territories(),
            BoardVariant::Classic => classic_territories(),
        };
        Self {
            variant: Some(variant),
            territories,
        }
    }

    /// Builds a catalog from caller-supplied territories after validating them.
    pub fn from_territories(territories: Vec<Territory>) -> Result<Self, BoardError> {
        validate(&territories)?;
        Ok(Self {
            variant: None,
            territories,
        })
    }

    pub fn variant(&self) -> Option<BoardVariant> {
        self.variant
    }

    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Fresh, unowned copies keyed by id, ready to be placed into a new game.
    pub fn instantiate(&self) -> HashMap<TerritoryId, Territory> {
        self.territories
            .iter()
            .map(|t| (t.id.clone(), t.clone()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        validate(&self.territories)
    }
}

fn validate(territories: &[Territory]) -> Result<(), BoardError> {
    if territories.is_empty() {
        return Err(BoardError::Empty);
    }

    let mut ids = HashSet::new();
    for territory in territories {
        if !ids.insert(territory.id.as_str()) {
            return Err(BoardError::DuplicateId(territory.id.clone()));
        }
    }

    for territory in territories {
        if let Some(unknown) = territory
            .adjacent_territory_ids
            .iter()
            .find(|n| !ids.contains(n.as_str()))
        {
            return Err(BoardError::UnknownNeighbour {
                from: territory.id.clone(),
                to: unknown.clone(),
            });
        }
    }

    Ok(())
}

fn demo_territories() -> Vec<Territory> {
    vec![
        Territory::new("arg", "Argentina", &["bra", "chi"]),
        Territory::new("bra", "Brasil", &["arg", "per"]),
        Territory::new("chi", "Chile", &["arg", "per"]),
        Territory::new("per", "Peru", &["bra", "chi"]),
    ]
}

const CLASSIC_TERRITORIES: &[(&str, &str)] = &[
    ("alaska", "Alaska"),
    ("northwest-territory", "Northwest Territory"),
    ("greenland", "Greenland"),
    ("alberta", "Alberta"),
    ("ontario", "Ontario"),
    ("quebec", "Quebec"),
    ("western-us", "Western United States"),
    ("eastern-us", "Eastern United States"),
    ("central-america", "Central America"),
    ("venezuela", "Venezuela"),
    ("peru", "Peru"),
    ("brazil", "Brazil"),
    ("argentina", "Argentina"),
    ("iceland", "Iceland"),
    ("scandinavia", "Scandinavia"),
    ("ukraine", "Ukraine"),
    ("great-britain", "Great Britain"),
    ("northern-europe", "Northern Europe"),
    ("western-europe", "Western Europe"),
    ("southern-europe", "Southern Europe"),
    ("north-africa", "North Africa"),
    ("egypt", "Egypt"),
    ("east-africa", "East Africa"),
    ("congo", "Congo"),
    ("south-africa", "South Africa"),
    ("madagascar", "Madagascar"),
    ("ural", "Ural"),
    ("siberia", "Siberia"),
    ("yakutsk", "Yakutsk"),
    ("kamchatka", "Kamchatka"),
    ("irkutsk", "Irkutsk"),
    ("mongolia", "Mongolia"),
    ("japan", "Japan"),
    ("afghanistan", "Afghanistan"),
    ("china", "China"),
    ("middle-east", "Middle East"),
    ("india", "India"),
    ("siam", "Siam"),
    ("indonesia", "Indonesia"),
    ("new-guinea", "New Guinea"),
    ("western-australia", "Western Australia"),
    ("eastern-australia", "Eastern Australia"),
];

const CLASSIC_BORDERS: &[(&str, &str)] = &[
    ("alaska", "northwest-territory"),
    ("alaska", "alberta"),
    ("alaska", "kamchatka"),
    ("northwest-territory", "alberta"),
    ("northwest-territory", "ontario"),
    ("northwest-territory", "greenland"),
    ("greenland", "ontario"),
    ("greenland", "quebec"),
    ("greenland", "iceland"),
    ("alberta", "ontario"),
    ("alberta", "western-us"),
    ("ontario", "quebec"),
    ("ontario", "western-us"),
    ("ontario", "eastern-us"),
    ("quebec", "eastern-us"),
    ("western-us", "eastern-us"),
    ("western-us", "central-america"),
    ("eastern-us", "central-america"),
    ("central-america", "venezuela"),
    ("venezuela", "peru"),
    ("venezuela", "brazil"),
    ("peru", "brazil"),
    ("peru", "argentina"),
    ("brazil", "argentina"),
    ("brazil", "north-africa"),
    ("iceland", "great-britain"),
    ("iceland", "scandinavia"),
    ("scandinavia", "great-britain"),
    ("scandinavia", "northern-europe"),
    ("scandinavia", "ukraine"),
    ("great-britain", "northern-europe"),
    ("great-britain", "western-europe"),
    ("northern-europe", "western-europe"),
    ("northern-europe", "southern-europe"),
    ("northern-europe", "ukraine"),
    ("western-europe", "southern-europe"),
    ("western-europe", "north-africa"),
    ("southern-europe", "ukraine"),
    ("southern-europe", "north-africa"),
    ("southern-europe", "egypt"),
    ("southern-europe", "middle-east"),
    ("ukraine", "ural"),
    ("ukraine", "afghanistan"),
    ("ukraine", "middle-east"),
    ("north-africa", "egypt"),
    ("north-africa", "east-africa"),
    ("north-africa", "congo"),
    ("egypt", "east-africa"),
    ("egypt", "middle-east"),
    ("east-africa", "congo"),
    ("east-africa", "south-africa"),
    ("east-africa", "madagascar"),
    ("east-africa", "middle-east"),
    ("congo", "south-africa"),
    ("south-africa", "madagascar"),
    ("ural", "siberia"),
    ("ural", "china"),
    ("ural", "afghanistan"),
    ("siberia", "yakutsk"),
    ("siberia", "irkutsk"),
    ("siberia", "mongolia"),
    ("siberia", "china"),
    ("yakutsk", "kamchatka"),
    ("yakutsk", "irkutsk"),
    ("kamchatka", "irkutsk"),
    ("kamchatka", "mongolia"),
    ("kamchatka", "japan"),
    ("irkutsk", "mongolia"),
    ("mongolia", "china"),
    ("mongolia", "japan"),
    ("afghanistan", "china"),
    ("afghanistan", "india"),
    ("afghanistan", "middle-east"),
    ("china", "india"),
    ("china", "siam"),
    ("middle-east", "india"),
    ("india", "siam"),
    ("siam", "indonesia"),
    ("indonesia", "new-guinea"),
    ("indonesia", "western-australia"),
    ("new-guinea", "eastern-australia"),
    ("new-guinea", "western-australia"),
    ("western-australia", "eastern-australia"),
];

/// Map labels drawn on the board that never take part in play.
const CLASSIC_DECORATIONS: &[(&str, &str)] = &[
    ("label-atlantic", "Atlantic Ocean"),
    ("label-pacific", "Pacific Ocean"),
];

fn classic_territories() -> Vec<Territory> {
    let mut territories: Vec<Territory> = CLASSIC_TERRITORIES
        .iter()
        .map(|(id, name)| Territory::new(id, name, &[]))
        .collect();

    let index: HashMap<&str, usize> = CLASSIC_TERRITORIES
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (*id, i))
        .collect();

    for (a, b) in CLASSIC_BORDERS {
        if let (Some(&ia), Some(&ib)) = (index.get(a), index.get(b)) {
            territories[ia].adjacent_territory_ids.push(b.to_string());
            territories[ib].adjacent_territory_ids.push(a.to_string());
        }
    }

    territories.extend(CLASSIC_DECORATIONS.iter().map(|(id, name)| {
        let mut label = Territory::new(id, name, &[]);
        label.clickable = false;
        label
    }));

    territories
}
