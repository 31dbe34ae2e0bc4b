//! Stateless display derivations, recomputed on every render.

/// Initials for a participant identifier: the part before `@` (the whole
/// string when there is no `@`), split on runs of `.`, `-`, `_` or space,
/// first character of each of the first two non-empty segments, uppercased.
///
/// `"jane.doe@example.com"` -> `"JD"`, `"bob@example.com"` -> `"B"`.
/// Identifiers with nothing but separators before the `@` yield an empty
/// string rather than an error.
pub fn initials(identifier: &str) -> String {
    let local = identifier.split('@').next().unwrap_or(identifier);
    local
        .split(['.', '-', '_', ' '])
        .filter(|segment| !segment.is_empty())
        .take(2)
        .filter_map(|segment| segment.chars().next())
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::initials;

    #[test]
    fn two_segment_email_uses_both_initials() {
        assert_eq!(initials("jane.doe@example.com"), "JD");
    }

    #[test]
    fn single_segment_email_uses_one_initial() {
        assert_eq!(initials("bob@example.com"), "B");
    }

    #[test]
    fn only_first_two_segments_count() {
        assert_eq!(initials("a_b_c@x.com"), "AB");
    }

    #[test]
    fn separator_runs_are_collapsed() {
        assert_eq!(initials("jane--doe@x.com"), "JD");
        assert_eq!(initials("mary jo.smith@x.com"), "MJ");
    }

    #[test]
    fn separator_only_local_part_yields_empty_string() {
        assert_eq!(initials("..@x.com"), "");
    }

    #[test]
    fn identifier_without_at_sign_is_used_whole() {
        assert_eq!(initials("jane.doe"), "JD");
    }

    #[test]
    fn lowercase_input_is_uppercased() {
        assert_eq!(initials("x-y@z"), "XY");
    }
}
