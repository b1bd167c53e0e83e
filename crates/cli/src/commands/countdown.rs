//! Countdown banner command.

use naked_pineapple_checkout::config::countdown_from_env;
use naked_pineapple_checkout::countdown::{CountdownView, spawn_countdown};

use super::{CommandError, OutputFormat, emit};

fn text(view: &CountdownView) -> String {
    match view {
        CountdownView::Unsupported { message } => format!("! {message}"),
        CountdownView::Active {
            title, subtitle, ..
        } => format!("{title} - {subtitle}"),
    }
}

/// Run the countdown, printing the banner once per second until zero.
///
/// # Errors
///
/// Returns an error if `CHECKOUT_COUNTDOWN_SECONDS` is invalid or output fails.
pub async fn run(
    seconds: Option<u64>,
    can_update_attributes: bool,
    format: OutputFormat,
) -> Result<(), CommandError> {
    let mut settings = countdown_from_env()?;
    if let Some(seconds) = seconds {
        settings.seconds = seconds;
    }

    let print = |remaining: u64| {
        let view = CountdownView::build(&settings, remaining, can_update_attributes);
        emit(format, &view, || text(&view), || view.render_html())
    };

    if !can_update_attributes {
        return print(settings.seconds);
    }

    let (mut rx, handle) = spawn_countdown(settings.seconds);
    print(*rx.borrow_and_update())?;

    while rx.changed().await.is_ok() {
        let remaining = *rx.borrow_and_update();
        print(remaining)?;
    }

    handle.await?;
    Ok(())
}
