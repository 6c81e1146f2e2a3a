use ammonia;

/// Sanitizes long-form HTML content (destination/event body text) before it
/// is stored. Whitelist-based: safe markup like <p> and <b> survives, while
/// <script>/<iframe> and event-handler attributes are stripped, so content
/// written through the back office cannot carry stored XSS to the site.
pub fn sanitize_content(input: &str) -> String {
    ammonia::clean(input)
}
