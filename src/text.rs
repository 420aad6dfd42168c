use rand::seq::SliceRandom;
use rand::Rng;

/// Width of every wrapped line; the final line may be shorter.
pub const LINE_WIDTH: usize = 60;
/// Upper bound on the flat text length.
pub const MAX_TEXT_LEN: usize = 300;
/// Cleaned input shorter than this is replaced by a fallback paragraph.
pub const MIN_TEXT_LEN: usize = 100;

pub const FALLBACK_TEXTS: [&str; 4] = [
    "The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs. Crazy Frederick bought many very exquisite opal jewels.",
    "How razorback-jumping frogs can level six piqued gymnasts! The five boxing wizards jump quickly. Jackdaws love my big sphinx of quartz.",
    "Bright vixens jump; dozy fowl quack. Quick wafting zephyrs vex bold Jim. Two driven jocks help fax my big quiz. Five quacking zephyrs jolt my wax bed.",
    "Amazingly few discotheques provide jukeboxes. My girl wove six dozen plaid jackets before she quit. Sixty zippers were quickly picked from the woven jute bag.",
];

/// The target text of one attempt, both flat and hard-wrapped at [`LINE_WIDTH`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    flat: String,
    lines: Vec<String>,
}

impl PreparedText {
    pub fn flat(&self) -> &str {
        &self.flat
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// (line, column) of flat index `idx`. Indices past the end map onto the
    /// end of the last line.
    pub fn position_of(&self, idx: usize) -> (usize, usize) {
        if self.lines.is_empty() {
            return (0, 0);
        }
        let line = (idx / LINE_WIDTH).min(self.lines.len() - 1);
        (line, idx - line * LINE_WIDTH)
    }
}

/// Clean `raw`, substitute a fallback when it is too short, truncate and wrap.
///
/// Never fails: the fallback set guarantees a typeable text.
pub fn prepare<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> PreparedText {
    let mut cleaned = clean(raw);
    if cleaned.len() < MIN_TEXT_LEN {
        cleaned = fallback_text(rng).to_string();
    }
    cleaned.truncate(MAX_TEXT_LEN);

    let lines = wrap(&cleaned);
    PreparedText {
        flat: cleaned,
        lines,
    }
}

/// Pick one of the [`FALLBACK_TEXTS`].
pub fn fallback_text<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FALLBACK_TEXTS
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_TEXTS[0])
}

/// Drop everything outside printable ASCII, then collapse whitespace runs.
pub fn clean(raw: &str) -> String {
    let printable: String = raw.chars().filter(|c| is_printable_ascii(*c)).collect();
    printable.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

// Hard character-count wrap; input is ASCII so byte chunks are char chunks.
fn wrap(flat: &str) -> Vec<String> {
    flat.as_bytes()
        .chunks(LINE_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}
