use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use super::MissingIdentifier;

/// Characters escaped when an identifier is spliced into a path. Includes
/// the comma, which separates the parts of composite keys.
const IDENTIFIER: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b',')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fill the `{token}` placeholders of `template` with `identifiers`, in
/// order. The names of the tokens are informational only; the n-th
/// placeholder always receives the n-th identifier.
///
/// Composite keys are written as comma-joined placeholder groups:
///
/// ```
/// # use emsearch::resolve_path;
/// let path = resolve_path(
///     "/api/syncItem/{syncItemId},{projectId}",
///     &[Some("A"), Some("B")],
/// )?;
/// assert_eq!(path, "/api/syncItem/A,B");
/// # Ok::<_, emsearch::MissingIdentifier>(())
/// ```
///
/// Fails if an identifier for a placeholder is unset, empty, or a dot
/// segment, which would be resolved away by the server.
pub fn resolve_path(
    template: &str,
    identifiers: &[Option<&str>],
) -> Result<String, MissingIdentifier> {
    let mut path = String::with_capacity(template.len());
    let mut identifiers = identifiers.iter();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };

        let token = &rest[start + 1..start + len];
        path.push_str(&rest[..start]);

        match identifiers.next() {
            Some(Some(id)) if !matches!(*id, "" | "." | "..") => {
                path.extend(utf8_percent_encode(id, IDENTIFIER))
            }
            _ => {
                return Err(MissingIdentifier {
                    token: token.to_string(),
                });
            }
        }

        rest = &rest[start + len + 1..];
    }

    path.push_str(rest);
    Ok(path)
}
