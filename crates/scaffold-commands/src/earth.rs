//! `/earth`: recent images from NASA's EPIC camera.

use crate::embeds::error_embed;
use crate::framework::{Context, Error};
use crate::paginator::paginate;
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Metadata endpoint for the most recent natural-colour images.
pub const EPIC_API_URL: &str = "https://epic.gsfc.nasa.gov/api/natural";
/// Root of the PNG archive.
pub const EPIC_ARCHIVE_URL: &str = "https://epic.gsfc.nasa.gov/archive/natural";

const PAGE_COLOUR: serenity::Colour = serenity::Colour::DARK_PURPLE;

/// One entry of the EPIC metadata feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpicImage {
    /// Capture timestamp, `YYYYMMDDhhmmss`.
    pub identifier: String,
    /// Human readable caption.
    pub caption: String,
    /// Archive file stem.
    pub image: String,
    /// Capture date as reported by the API.
    pub date: String,
    /// Coordinates block.
    pub coords: EpicCoords,
}

/// Coordinates block of an [`EpicImage`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpicCoords {
    /// Point on Earth the camera was centred on.
    pub centroid_coordinates: LatLon,
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Errors shown to the user when the feed cannot be used.
#[derive(Debug, Error)]
pub enum EpicError {
    /// Non-200 response.
    #[error("NASA API returned status code `{0}`")]
    Status(u16),

    /// Transport or JSON failure.
    #[error(
        "NASA API returned invalid data! It might be broken right now - try again later.\n```\n{0}```"
    )]
    InvalidData(String),

    /// The feed had nothing to show.
    #[error("NASA API returned no images")]
    Empty,

    /// An identifier too short to derive the archive path from.
    #[error("NASA API returned an unexpected image identifier `{0}`")]
    BadIdentifier(String),
}

impl EpicImage {
    /// PNG archive URL, `<archive>/YYYY/MM/DD/png/<image>.png`.
    pub fn archive_url(&self) -> Result<String, EpicError> {
        let id = &self.identifier;
        match (id.get(0..4), id.get(4..6), id.get(6..8)) {
            (Some(year), Some(month), Some(day)) => Ok(format!(
                "{EPIC_ARCHIVE_URL}/{year}/{month}/{day}/png/{}.png",
                self.image
            )),
            _ => Err(EpicError::BadIdentifier(id.clone())),
        }
    }

    /// Embed shown for this image.
    pub fn to_embed(&self) -> Result<serenity::CreateEmbed, EpicError> {
        let coords = self.coords.centroid_coordinates;
        Ok(serenity::CreateEmbed::new()
            .colour(PAGE_COLOUR)
            .title(&self.caption)
            .description(format!(
                "Date: {}\nLatitude: {}\nLongitude: {}",
                self.date, coords.lat, coords.lon
            ))
            .image(self.archive_url()?))
    }
}

/// Fetches the metadata feed from `api_url`.
pub async fn fetch_images(
    client: &reqwest::Client,
    api_url: &str,
    api_key: &str,
) -> Result<Vec<EpicImage>, EpicError> {
    let invalid = |e: reqwest::Error| EpicError::InvalidData(e.to_string());

    let response = client
        .get(api_url)
        .query(&[("api_key", api_key)])
        .send()
        .await
        .map_err(invalid)?;

    if response.status() != StatusCode::OK {
        return Err(EpicError::Status(response.status().as_u16()));
    }

    let images: Vec<EpicImage> = response.json().await.map_err(invalid)?;
    debug!("EPIC feed returned {} images", images.len());
    Ok(images)
}

/// Every second image turned into an embed.
pub fn build_pages(images: &[EpicImage]) -> Result<Vec<serenity::CreateEmbed>, EpicError> {
    let pages = images
        .iter()
        .step_by(2)
        .map(EpicImage::to_embed)
        .collect::<Result<Vec<_>, _>>()?;

    if pages.is_empty() {
        return Err(EpicError::Empty);
    }
    Ok(pages)
}

/// Get images of earth via NASA's EPIC camera on the NOAA DSCOVR.
#[poise::command(slash_command, category = "General")]
pub async fn earth(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let client = data.http.client()?;

    let pages = match fetch_images(&client, EPIC_API_URL, &data.config.nasa.api_key).await {
        Ok(images) => build_pages(&images),
        Err(e) => Err(e),
    };

    match pages {
        Ok(pages) => paginate(ctx, pages).await,
        Err(e) => {
            ctx.send(CreateReply::default().embed(error_embed(e.to_string())))
                .await?;
            Ok(())
        }
    }
}
