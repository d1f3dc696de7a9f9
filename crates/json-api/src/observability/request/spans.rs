//! Route labels for spans and metrics.

/// Label for requests that matched no route.
pub(super) const UNMATCHED_ROUTE: &str = "unknown";

/// Rebuild the route template of a matched request.
///
/// Path segments captured by a route parameter become `{name}`, so every
/// request to one route shares a label whatever its parameter values.
pub(super) fn route_label<'a>(
    path: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> String {
    let mut segments: Vec<String> = path
        .trim_matches('/')
        .split('/')
        .map(str::to_owned)
        .collect();

    for (name, value) in params {
        let value = value.trim_matches('/');

        if value.is_empty() {
            continue;
        }

        let captured: Vec<&str> = value.split('/').collect();

        let position = segments.windows(captured.len()).rposition(|window| {
            window
                .iter()
                .map(String::as_str)
                .eq(captured.iter().copied())
        });

        if let Some(start) = position {
            let placeholder = format!("{{{}}}", name.trim_start_matches('*'));

            let tail = segments.split_off(start + captured.len());

            segments.truncate(start);
            segments.push(placeholder);
            segments.extend(tail);
        }
    }

    format!("/{}", segments.join("/"))
}
