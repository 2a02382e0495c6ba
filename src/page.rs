//! Voting page rendering.
//!
//! One static page: two submit buttons labeled with the configured options,
//! the last accepted vote (POST only), and the serving host for curiosity
//! when running replicated.

use crate::config::Config;

pub fn render_index(config: &Config, vote: Option<&str>) -> String {
    let result = match vote {
        Some(value) => format!("<p id=\"result\">Vote recorded: {}</p>", escape(value)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>{a} vs {b}</title>
  </head>
  <body>
    <form id="choice" method="POST" action="/">
      <button type="submit" name="vote" value="{a}">{a}</button>
      <button type="submit" name="vote" value="{b}">{b}</button>
    </form>
    {result}
    <p id="hostname">Processed by {host}</p>
  </body>
</html>
"#,
        a = config.option_a,
        b = config.option_b,
        host = config.hostname,
    )
}

// The vote value is arbitrary client input echoed back into the page.
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
