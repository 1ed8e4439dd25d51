use deunicode::deunicode_char;

/// Reduce a string to lowercase ascii, digits and single dashes.
pub fn slugify<S: AsRef<str>>(s: S) -> String {
    let mut slug = String::with_capacity(s.as_ref().len());
    // Starts with true to avoid a leading dash.
    let mut prev_dash = true;

    let mut push_byte = |slug: &mut String, prev_dash: &mut bool, x: u8| match x {
        b'a'..=b'z' | b'0'..=b'9' => {
            *prev_dash = false;
            slug.push(x.into());
        }
        b'A'..=b'Z' => {
            *prev_dash = false;
            slug.push((x - b'A' + b'a').into());
        }
        _ => {
            if !*prev_dash {
                slug.push('-');
                *prev_dash = true;
            }
        }
    };

    for c in s.as_ref().chars() {
        if c.is_ascii() {
            push_byte(&mut slug, &mut prev_dash, c as u8);
        } else {
            for &b in deunicode_char(c).unwrap_or("-").as_bytes() {
                push_byte(&mut slug, &mut prev_dash, b);
            }
        }
    }

    if slug.ends_with('-') {
        slug.pop();
    }
    slug.shrink_to_fit();
    slug
}

/// Build a cache file name from a wallpaper URL path, preserving the
/// extension when the last path segment carries one.
pub fn cache_file_name(url_path: &str) -> String {
    let trimmed = url_path.trim_matches('/');
    if trimmed.is_empty() {
        return "wallpaper".to_string();
    }
    match trimmed.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.len() <= 5 && !ext.contains('/') => {
            format!("{}.{}", slugify(stem), slugify(ext))
        }
        _ => slugify(trimmed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("hello world"), "hello-world");
        assert_eq!(slugify("HeLLo WoRLD"), "hello-world");
        assert_eq!(slugify("hello & world"), "hello-world");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("héllo wörld"), "hello-world");
    }

    #[test]
    fn test_slugify_edge_cases() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_cache_file_name() {
        assert_eq!(
            cache_file_name("/collections/nature/Misty Lake.png"),
            "collections-nature-misty-lake.png"
        );
        assert_eq!(cache_file_name("/plain"), "plain");
        assert_eq!(cache_file_name("/"), "wallpaper");
    }
}
