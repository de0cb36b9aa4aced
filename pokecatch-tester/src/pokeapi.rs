//! `PokeAPI` creature provider.
use anyhow::{Context, Result};
use async_trait::async_trait;
use pokecatch_game::{CreatureProvider, CreatureRecord, ProviderError, StatEntry};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct PokemonDto {
    id: u16,
    name: String,
    height: u32,
    weight: u32,
    sprites: SpritesDto,
    types: Vec<TypeSlotDto>,
    stats: Vec<StatDto>,
}

#[derive(Debug, Deserialize)]
struct SpritesDto {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TypeSlotDto {
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Debug, Deserialize)]
struct StatDto {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

impl From<PokemonDto> for CreatureRecord {
    fn from(dto: PokemonDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            sprite_url: dto.sprites.front_default,
            types: dto.types.into_iter().map(|slot| slot.kind.name).collect(),
            height: dto.height,
            weight: dto.weight,
            stats: dto
                .stats
                .into_iter()
                .map(|s| StatEntry {
                    name: s.stat.name,
                    base_value: s.base_stat,
                })
                .collect(),
        }
    }
}

/// Parse a `/pokemon/{id}` response body.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] if the body does not have the
/// expected shape.
pub fn parse_pokemon(body: &str) -> Result<CreatureRecord, ProviderError> {
    serde_json::from_str::<PokemonDto>(body)
        .map(CreatureRecord::from)
        .map_err(|e| ProviderError::Malformed(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct PokeApiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, id: u16) -> String {
        format!("{}/pokemon/{id}", self.base_url)
    }
}

#[async_trait]
impl CreatureProvider for PokeApiProvider {
    async fn fetch_by_id(&self, id: u16) -> Result<CreatureRecord, ProviderError> {
        let url = self.url_for(id);
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        parse_pokemon(&body)
    }
}
