use anyhow::Result;
use async_trait::async_trait;
use clap::ValueEnum;
use pokecatch_game::{CreatureProvider, CreatureRecord, ProviderError, StaticProvider};

use crate::pokeapi::PokeApiProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Live data from PokeAPI (needs network)
    Pokeapi,
    /// Offline fixtures; every id answers
    Fixture,
}

/// The provider chosen on the command line.
#[derive(Debug, Clone)]
pub enum AnyProvider {
    PokeApi(PokeApiProvider),
    Fixture(StaticProvider),
}

impl AnyProvider {
    pub fn from_kind(kind: ProviderKind, api_base: &str) -> Result<Self> {
        Ok(match kind {
            ProviderKind::Pokeapi => Self::PokeApi(PokeApiProvider::new(api_base)?),
            ProviderKind::Fixture => {
                Self::Fixture(StaticProvider::kanto_sample().synthesize_missing())
            }
        })
    }
}

#[async_trait]
impl CreatureProvider for AnyProvider {
    async fn fetch_by_id(&self, id: u16) -> Result<CreatureRecord, ProviderError> {
        match self {
            Self::PokeApi(provider) => provider.fetch_by_id(id).await,
            Self::Fixture(provider) => provider.fetch_by_id(id).await,
        }
    }
}
