//! Button paginator over a list of embeds.

use crate::framework::{Context, Error};
use poise::serenity_prelude as serenity;
use poise::CreateReply;
use std::time::Duration;

/// How long the buttons stay responsive after the last press.
const PAGINATOR_TIMEOUT: Duration = Duration::from_secs(180);

/// Position within a fixed number of pages, wrapping at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    current: usize,
    total: usize,
}

impl PageCursor {
    /// Cursor on the first of `total` pages.
    pub const fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Index of the current page.
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Moves to the next page, wrapping to the first.
    pub fn next(&mut self) -> usize {
        if self.total > 0 {
            self.current = (self.current + 1) % self.total;
        }
        self.current
    }

    /// Moves to the previous page, wrapping to the last.
    pub fn previous(&mut self) -> usize {
        if self.total > 0 {
            self.current = self.current.checked_sub(1).unwrap_or(self.total - 1);
        }
        self.current
    }

    /// Footer label, e.g. `Page 2 of 5`.
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current + 1, self.total)
    }
}

fn page(embeds: &[serenity::CreateEmbed], cursor: PageCursor) -> serenity::CreateEmbed {
    embeds[cursor.current()]
        .clone()
        .footer(serenity::CreateEmbedFooter::new(cursor.label()))
}

/// Sends the first embed with previous/next buttons only its author can use.
pub async fn paginate(ctx: Context<'_>, embeds: Vec<serenity::CreateEmbed>) -> Result<(), Error> {
    if embeds.is_empty() {
        return Ok(());
    }

    let ctx_id = ctx.id();
    let prev_button_id = format!("{ctx_id}prev");
    let next_button_id = format!("{ctx_id}next");
    let mut cursor = PageCursor::new(embeds.len());

    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(&prev_button_id).emoji('◀'),
        serenity::CreateButton::new(&next_button_id).emoji('▶'),
    ]);
    let reply = CreateReply::default()
        .embed(page(&embeds, cursor))
        .components(vec![buttons]);
    let handle = ctx.send(reply).await?;

    let author_id = ctx.author().id;
    while let Some(press) = serenity::collector::ComponentInteractionCollector::new(ctx)
        .author_id(author_id)
        .filter(move |press| press.data.custom_id.starts_with(&ctx_id.to_string()))
        .timeout(PAGINATOR_TIMEOUT)
        .await
    {
        if press.data.custom_id == next_button_id {
            cursor.next();
        } else if press.data.custom_id == prev_button_id {
            cursor.previous();
        } else {
            continue;
        }

        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new().embed(page(&embeds, cursor)),
                ),
            )
            .await?;
    }

    // Drop the buttons once nobody can use them anymore.
    handle
        .edit(
            ctx,
            CreateReply::default()
                .embed(page(&embeds, cursor))
                .components(Vec::new()),
        )
        .await?;
    Ok(())
}
