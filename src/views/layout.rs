use maud::{html, Markup, DOCTYPE};

pub const STYLESHEET: &str = "/public/style.css";

/// Full HTML document around `body`.
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href=(STYLESHEET);
            }
            body {
                main.container {
                    (body)
                }
            }
        }
    }
}
