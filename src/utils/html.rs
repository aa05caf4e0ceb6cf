// src/utils/html.rs

/// Sanitises post bodies with ammonia's default allow-list.
///
/// Formatting tags such as `<p>` and `<b>` survive; `<script>`, `<iframe>`
/// and event-handler attributes are removed along with script contents.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
