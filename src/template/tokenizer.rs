// Splits a template into the chunks that live inside and outside of `{...}`

/// Splits a template into chunks inside and outside of an expression,
/// delimited by curly braces. Nested braces stay in the outer chunk, so
/// `foo{bar{baz}}` yields `foo` and `{bar{baz}}`.
pub struct ChunkTokenizer<'a> {
    template: &'a str,
    tokens: std::vec::IntoIter<(usize, usize)>,
}

impl<'a> ChunkTokenizer<'a> {
    pub fn new(template: &'a str) -> Self {
        let mut spans = Vec::new();
        let mut outside = true;
        let mut level = 0usize;
        let mut last_index = 0;

        for (idx, ch) in template.char_indices() {
            match ch {
                '{' if outside => {
                    if last_index < idx {
                        spans.push((last_index, idx));
                    }
                    last_index = idx;
                    outside = false;
                }
                '{' => level += 1,
                '}' if !outside => {
                    if level > 0 {
                        // only the outermost boundary closes the token
                        level -= 1;
                    } else {
                        spans.push((last_index, idx + 1));
                        last_index = idx + 1;
                        outside = true;
                    }
                }
                _ => {}
            }
        }

        if last_index < template.len() {
            spans.push((last_index, template.len()));
        }

        Self {
            template,
            tokens: spans.into_iter(),
        }
    }
}

impl<'a> Iterator for ChunkTokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens
            .next()
            .map(|(start, end)| &self.template[start..end])
    }
}
