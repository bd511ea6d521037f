use crate::Error;
use crate::types::RequestMeta;
use http::Extensions;
use percent_encoding::percent_decode_str;

pub(crate) fn update_req_meta_in_extensions(ext: &mut Extensions, meta: RequestMeta) {
    if let Some(existing) = ext.get_mut::<RequestMeta>() {
        existing.merge(meta);
    } else {
        ext.insert(meta);
    }
}

/// Percent-decodes one raw captured value. An absent or empty capture decodes
/// to `None`; a capture which unescapes to invalid UTF-8 is an error of the
/// whole dispatch step.
pub(crate) fn decode_param(raw: Option<&str>) -> crate::Result<Option<String>> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| Error::new(format!("could not percent decode the parameter value {:?}: {}", raw, e)))?;

    Ok(Some(decoded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::decode_param;

    #[test]
    fn decodes_percent_escapes() {
        assert_eq!(decode_param(Some("rust%20lang")).unwrap(), Some("rust lang".to_owned()));
        assert_eq!(decode_param(Some("caf%C3%A9")).unwrap(), Some("café".to_owned()));
    }

    #[test]
    fn passes_plain_values_through() {
        assert_eq!(decode_param(Some("alice")).unwrap(), Some("alice".to_owned()));
    }

    #[test]
    fn treats_empty_and_absent_captures_as_not_present() {
        assert_eq!(decode_param(Some("")).unwrap(), None);
        assert_eq!(decode_param(None).unwrap(), None);
    }

    #[test]
    fn fails_on_an_escape_which_is_not_utf8() {
        assert!(decode_param(Some("%FF")).is_err());
    }
}
