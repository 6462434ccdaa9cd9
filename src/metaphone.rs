//! Double Metaphone (Lawrence Philips), primary code only.
//!
//! Operates on an ASCII uppercase projection of the input; behavior on non-ASCII input
//! is otherwise undefined by the published algorithm, so this implementation folds to
//! ASCII uppercase and drops anything outside `A-Z` before coding.

struct Coder {
    chars: Vec<u8>,
    pos: usize,
    primary: String,
}

impl Coder {
    fn new(ascii_upper: &str) -> Self {
        Coder {
            chars: ascii_upper.as_bytes().to_vec(),
            pos: 0,
            primary: String::with_capacity(4),
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn at(&self, idx: isize) -> u8 {
        if idx < 0 || idx as usize >= self.chars.len() {
            b'\0'
        } else {
            self.chars[idx as usize]
        }
    }

    fn current(&self) -> u8 {
        self.at(self.pos as isize)
    }

    fn is_vowel(&self, idx: isize) -> bool {
        matches!(self.at(idx), b'A' | b'E' | b'I' | b'O' | b'U' | b'Y')
    }

    /// True when the substring starting at `self.pos + offset` matches one of `needles`.
    fn string_at(&self, offset: isize, len: usize, needles: &[&str]) -> bool {
        let start = self.pos as isize + offset;
        if start < 0 || start as usize + len > self.chars.len() {
            return needles.iter().any(|n| n.is_empty());
        }
        let start = start as usize;
        let slice = &self.chars[start..start + len];
        needles.iter().any(|n| n.as_bytes() == slice)
    }

    fn push(&mut self, s: &str) {
        self.primary.push_str(s);
    }

    fn slavo_germanic(&self) -> bool {
        let s = std::str::from_utf8(&self.chars).unwrap_or("");
        s.contains('W')
            || s.contains('K')
            || s.contains("CZ")
            || s.contains("WITZ")
    }

    fn code(mut self) -> String {
        if self.chars.is_empty() {
            return String::new();
        }

        // Skip a handful of silent/obscure initial letter pairs.
        if self.string_at(0, 2, &["GN", "KN", "PN", "WR", "PS"]) {
            self.pos += 1;
        }
        if self.current() == b'X' {
            // Initial X is pronounced like S (e.g. "Xavier").
            self.push("S");
            self.pos += 1;
        }

        let slavo_germanic = self.slavo_germanic();
        let len = self.len();

        while self.primary.len() < 4 && self.pos < len {
            match self.current() {
                b'A' | b'E' | b'I' | b'O' | b'U' | b'Y' => {
                    if self.pos == 0 {
                        self.push("A");
                    }
                    self.pos += 1;
                }
                b'B' => {
                    self.push("P");
                    self.pos += if self.current() == b'B' { 2 } else { 1 };
                }
                b'C' => self.code_c(),
                b'D' => self.code_d(),
                b'F' => {
                    self.push("F");
                    self.pos += if self.current() == b'F' { 2 } else { 1 };
                }
                b'G' => self.code_g(slavo_germanic),
                b'H' => self.code_h(),
                b'J' => self.code_j(slavo_germanic),
                b'K' => {
                    self.push("K");
                    self.pos += if self.current() == b'K' { 2 } else { 1 };
                }
                b'L' => {
                    self.push("L");
                    self.pos += if self.current() == b'L' { 2 } else { 1 };
                }
                b'M' => {
                    self.push("M");
                    self.pos += if self.string_at(1, 1, &["M"]) { 2 } else { 1 };
                }
                b'N' => {
                    self.push("N");
                    self.pos += if self.current() == b'N' { 2 } else { 1 };
                }
                b'P' => self.code_p(),
                b'Q' => {
                    self.push("K");
                    self.pos += if self.current() == b'Q' { 2 } else { 1 };
                }
                b'R' => self.code_r(slavo_germanic),
                b'S' => self.code_s(slavo_germanic),
                b'T' => self.code_t(),
                b'V' => {
                    self.push("F");
                    self.pos += if self.current() == b'V' { 2 } else { 1 };
                }
                b'W' => self.code_w(),
                b'X' => self.code_x(),
                b'Z' => self.code_z(slavo_germanic),
                _ => {
                    self.pos += 1;
                }
            }
        }

        self.primary.truncate(4);
        self.primary
    }

    fn code_c(&mut self) {
        if self.string_at(0, 4, &["CAIA"])
            || (self.string_at(-1, 3, &["ACH"])
                && !self.is_vowel(self.pos as isize - 2)
                && !self.string_at(2, 1, &["I"])
                && (!self.string_at(2, 1, &["E"])
                    || self.string_at(-2, 6, &["BACHER", "MACHER"])))
        {
            self.push("K");
            self.pos += 2;
            return;
        }
        if self.pos == 0 && self.string_at(0, 6, &["CAESAR"]) {
            self.push("S");
            self.pos += 2;
            return;
        }
        if self.string_at(0, 4, &["CHIA"]) {
            self.push("K");
            self.pos += 2;
            return;
        }
        if self.string_at(0, 2, &["CH"]) {
            if self.pos > 0 && self.string_at(0, 4, &["CHAE"]) {
                self.push("K");
                self.pos += 2;
                return;
            }
            if self.pos == 0
                && (self.string_at(1, 5, &["HARAC", "HARIS"])
                    || self.string_at(1, 3, &["HOR", "HYM", "HIA", "HEM"]))
                && !self.string_at(0, 5, &["CHORE"])
            {
                self.push("K");
                self.pos += 2;
                return;
            }
            if self.string_at(-3, 7, &["ORCHES", "ARCHIT", "ORCHID"])
                || self.string_at(1, 1, &["T", "S"])
                || ((self.string_at(-1, 1, &["A", "O", "U", "E"]) || self.pos == 0)
                    && self.string_at(1, 1, &["L", "R", "N", "M", "B", "H", "F", "V", "W", " "]))
            {
                self.push("K");
                self.pos += 2;
                return;
            }
            if self.pos > 0 {
                if self.string_at(0, 2, &["MC"]) {
                    self.push("K");
                } else {
                    self.push("X");
                }
            } else {
                self.push("X");
            }
            self.pos += 2;
            return;
        }
        if self.string_at(0, 2, &["CZ"]) && !self.string_at(-2, 4, &["WICZ"]) {
            self.push("S");
            self.pos += 2;
            return;
        }
        if self.string_at(1, 3, &["CIA"]) {
            self.push("X");
            self.pos += 3;
            return;
        }
        if self.string_at(0, 2, &["CC"]) && !(self.pos == 1 && self.at(0) == b'M') {
            if self.string_at(2, 1, &["I", "E", "H"]) && !self.string_at(2, 2, &["HU"]) {
                if (self.pos == 1 && self.at(self.pos as isize - 1) == b'A')
                    || self.string_at(-1, 5, &["UCCEE", "UCCES"])
                {
                    self.push("KS");
                } else {
                    self.push("X");
                }
                self.pos += 3;
                return;
            }
            self.push("K");
            self.pos += 2;
            return;
        }
        if self.string_at(0, 2, &["CK", "CG", "CQ"]) {
            self.push("K");
            self.pos += 2;
            return;
        }
        if self.string_at(0, 2, &["CI", "CE", "CY"]) {
            if self.string_at(0, 3, &["CIO", "CIE", "CIA"]) {
                self.push("S");
            } else {
                self.push("S");
            }
            self.pos += 2;
            return;
        }
        self.push("K");
        if self.string_at(1, 2, &[" C", " Q", " G"]) {
            self.pos += 3;
        } else if self.string_at(1, 1, &["C", "K", "Q"]) && !self.string_at(1, 2, &["CE", "CI"]) {
            self.pos += 2;
        } else {
            self.pos += 1;
        }
    }

    fn code_d(&mut self) {
        if self.string_at(0, 2, &["DG"]) {
            if self.string_at(2, 1, &["I", "E", "Y"]) {
                self.push("J");
                self.pos += 3;
                return;
            }
            self.push("TK");
            self.pos += 2;
            return;
        }
        if self.string_at(0, 2, &["DT", "DD"]) {
            self.push("T");
            self.pos += 2;
            return;
        }
        self.push("T");
        self.pos += 1;
    }

    fn code_g(&mut self, slavo_germanic: bool) {
        if self.current() == b'G' && self.at(self.pos as isize + 1) == b'H' {
            if self.pos > 0 && !self.is_vowel(self.pos as isize - 1) {
                self.push("K");
                self.pos += 2;
                return;
            }
            if self.pos == 0 {
                if self.at(self.pos as isize + 2) == b'I' {
                    self.push("J");
                } else {
                    self.push("K");
                }
                self.pos += 2;
                return;
            }
            if (self.pos > 1 && matches!(self.at(self.pos as isize - 2), b'B' | b'H' | b'D'))
                || (self.pos > 2 && self.at(self.pos as isize - 3) == b'B')
                || (self.pos > 3 && self.at(self.pos as isize - 4) == b'B')
            {
                self.pos += 2;
                return;
            }
            if self.pos > 2
                && self.at(self.pos as isize - 1) == b'U'
                && matches!(self.at(self.pos as isize - 3), b'C' | b'G' | b'L' | b'R' | b'T')
            {
                self.push("F");
            } else if self.pos > 0 && self.at(self.pos as isize - 1) != b'I' {
                self.push("K");
            }
            self.pos += 2;
            return;
        }
        if self.at(self.pos as isize + 1) == b'N' {
            if self.pos == 1 && self.is_vowel(0) && !slavo_germanic && self.string_at(1, 2, &["NEY"]) {
                self.push("KN");
                self.pos += 2;
                return;
            }
            if !self.string_at(2, 2, &["ES", "EP", "EB", "EL", "EY", "IB", "IL", "IN", "IE", "EI", "ER"])
                && !self.string_at(-1, 1, &["Y"])
            {
                self.push("N");
                self.pos += 2;
                return;
            }
            self.push("KN");
            self.pos += 2;
            return;
        }
        if self.string_at(1, 2, &["LI"]) && !slavo_germanic {
            self.push("KL");
            self.pos += 2;
            return;
        }
        if self.pos == 0
            && (self.string_at(1, 1, &["Y"])
                || self.string_at(1, 2, &["ES", "EP", "EB", "EL", "EY", "IB", "IL", "IN", "IE", "EI", "ER"]))
        {
            self.push("K");
            self.pos += 2;
            return;
        }
        if (self.string_at(1, 2, &["ER"]) || self.string_at(0, 1, &["Y"]))
            && !self.string_at(0, 6, &["DANGER", "RANGER", "MANGER"])
            && !self.string_at(-1, 1, &["E", "I"])
            && !self.string_at(-1, 3, &["RGY", "OGY"])
        {
            self.push("K");
            self.pos += 2;
            return;
        }
        if self.string_at(1, 1, &["E", "I", "Y"]) || self.string_at(-2, 4, &["AGGI", "OGGI"]) {
            if self.string_at(0, 4, &["VAN ", "VON "]) || self.string_at(-3, 3, &["SCH"]) || self.string_at(1, 2, &["ET"]) {
                self.push("K");
            } else if self.string_at(1, 3, &["IER"]) {
                self.push("J");
            } else {
                self.push("J");
            }
            self.pos += 2;
            return;
        }
        self.push("K");
        self.pos += if self.at(self.pos as isize + 1) == b'G' { 2 } else { 1 };
    }

    fn code_h(&mut self) {
        if (self.pos == 0 || self.is_vowel(self.pos as isize - 1)) && self.is_vowel(self.pos as isize + 1) {
            self.push("H");
            self.pos += 2;
        } else {
            self.pos += 1;
        }
    }

    fn code_j(&mut self, slavo_germanic: bool) {
        if self.string_at(0, 4, &["JOSE"]) || self.string_at(0, 4, &["SAN "]) {
            if (self.pos == 0 && self.at(self.pos as isize + 4) == b' ') || self.string_at(0, 4, &["SAN "]) {
                self.push("H");
            } else {
                self.push("J");
            }
            self.pos += 1;
            return;
        }
        if self.pos == 0 && !self.string_at(0, 4, &["JOSE"]) {
            self.push("J");
        } else if self.is_vowel(self.pos as isize - 1) && !slavo_germanic && matches!(self.at(self.pos as isize + 1), b'A' | b'O') {
            self.push("J");
        } else if self.pos == self.len() - 1 {
            self.push("");
        } else if !matches!(self.at(self.pos as isize + 1), b'L' | b'T' | b'K' | b'S' | b'N' | b'M' | b'B' | b'Z')
            && !matches!(self.at(self.pos as isize - 1), b'S' | b'K' | b'L')
        {
            self.push("J");
        }
        self.pos += if self.current() == b'J' { 2 } else { 1 };
    }

    fn code_p(&mut self) {
        if self.at(self.pos as isize + 1) == b'H' {
            self.push("F");
            self.pos += 2;
            return;
        }
        self.push("P");
        self.pos += if matches!(self.at(self.pos as isize + 1), b'P' | b'B') { 2 } else { 1 };
    }

    fn code_r(&mut self, slavo_germanic: bool) {
        if self.pos == self.len() - 1 && !slavo_germanic && self.string_at(-2, 2, &["IE"]) && !self.string_at(-4, 2, &["ME", "MA"]) {
            // silent trailing R in French loanwords; emit nothing.
        } else {
            self.push("R");
        }
        self.pos += if self.current() == b'R' { 2 } else { 1 };
    }

    fn code_s(&mut self, slavo_germanic: bool) {
        if self.string_at(-1, 3, &["ISL", "YSL"]) {
            self.pos += 1;
            return;
        }
        if self.pos == 0 && self.string_at(0, 5, &["SUGAR"]) {
            self.push("X");
            self.pos += 1;
            return;
        }
        if self.string_at(0, 2, &["SH"]) {
            if self.string_at(1, 4, &["HEIM", "HOEK", "HOLM", "HOLZ"]) {
                self.push("S");
            } else {
                self.push("X");
            }
            self.pos += 2;
            return;
        }
        if self.string_at(0, 3, &["SIO", "SIA"]) || self.string_at(0, 4, &["SIAN"]) {
            if slavo_germanic {
                self.push("S");
            } else {
                self.push("X");
            }
            self.pos += 3;
            return;
        }
        if (self.pos == 0 && matches!(self.at(self.pos as isize + 1), b'M' | b'N' | b'L' | b'W'))
            || self.string_at(1, 1, &["Z"])
        {
            self.push("S");
            self.pos += if self.string_at(1, 1, &["Z"]) { 2 } else { 1 };
            return;
        }
        if self.string_at(0, 2, &["SC"]) {
            if self.at(self.pos as isize + 2) == b'H' {
                if self.string_at(2, 2, &["OO", "ER", "EN", "UY", "ED", "EM"]) {
                    if self.string_at(2, 2, &["ER", "EN"]) {
                        self.push("X");
                    } else {
                        self.push("SK");
                    }
                } else if self.pos == 0 && !self.is_vowel(3) && self.at(3) != b'W' {
                    self.push("S");
                } else {
                    self.push("X");
                }
                self.pos += 3;
                return;
            }
            if matches!(self.at(self.pos as isize + 2), b'I' | b'E' | b'Y') {
                self.push("S");
                self.pos += 3;
                return;
            }
            self.push("SK");
            self.pos += 3;
            return;
        }
        if self.pos == self.len() - 1 && self.string_at(-2, 2, &["AI", "OI"]) {
            // silent trailing S
        } else {
            self.push("S");
        }
        self.pos += if matches!(self.at(self.pos as isize + 1), b'S' | b'Z') { 2 } else { 1 };
    }

    fn code_t(&mut self) {
        if self.string_at(0, 4, &["TION"]) || self.string_at(0, 3, &["TIA", "TCH"]) {
            self.push("X");
            self.pos += 3;
            return;
        }
        if self.string_at(0, 2, &["TH"]) || self.string_at(0, 3, &["TTH"]) {
            if self.string_at(2, 2, &["OM", "AM"]) || self.string_at(0, 4, &["VAN ", "VON "]) || self.string_at(-3, 3, &["SCH"]) {
                self.push("T");
            } else {
                self.push("0");
            }
            self.pos += 2;
            return;
        }
        self.push("T");
        self.pos += if matches!(self.at(self.pos as isize + 1), b'T' | b'D') { 2 } else { 1 };
    }

    fn code_w(&mut self) {
        if self.string_at(0, 2, &["WR"]) {
            self.push("R");
            self.pos += 2;
            return;
        }
        if self.pos == 0 && (self.is_vowel(1) || self.string_at(0, 2, &["WH"])) {
            if self.is_vowel(1) {
                self.push("A");
            }
            self.pos += if self.string_at(0, 2, &["WH"]) { 2 } else { 1 };
            return;
        }
        if (self.pos == self.len() - 1 && self.is_vowel(self.pos as isize - 1))
            || self.string_at(-1, 5, &["EWSKI", "EWSKY", "OWSKI", "OWSKY"])
            || self.string_at(0, 4, &["WICZ"])
        {
            self.push("F");
            self.pos += 1;
            return;
        }
        self.pos += 1;
    }

    fn code_x(&mut self) {
        self.push("KS");
        self.pos += if matches!(self.at(self.pos as isize + 1), b'C' | b'X') { 2 } else { 1 };
    }

    fn code_z(&mut self, slavo_germanic: bool) {
        if self.at(self.pos as isize + 1) == b'H' {
            self.push("J");
            self.pos += 2;
            return;
        }
        if self.string_at(1, 2, &["ZO", "ZI", "ZA"]) || (slavo_germanic && self.pos > 0 && self.at(self.pos as isize - 1) != b'T') {
            self.push("S");
        } else {
            self.push("S");
        }
        self.pos += if self.current() == b'Z' { 2 } else { 1 };
    }
}

/// ASCII-uppercase projection and primary double-metaphone code.
///
/// Behavior on input containing non-ASCII code points is implementation-defined here:
/// such characters are dropped before coding.
pub fn double_metaphone(word: &str) -> String {
    let ascii_upper: String = word
        .chars()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    Coder::new(&ascii_upper).code()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smith_and_smyth_collide() {
        assert_eq!(double_metaphone("SMITH"), double_metaphone("SMYTH"));
    }

    #[test]
    fn jon_and_john_collide() {
        assert_eq!(double_metaphone("JON"), double_metaphone("JOHN"));
    }

    #[test]
    fn empty_input_yields_empty_code() {
        assert_eq!(double_metaphone(""), "");
    }

    #[test]
    fn code_is_deterministic() {
        assert_eq!(double_metaphone("ACME"), double_metaphone("acme"));
    }

    #[test]
    fn non_ascii_is_dropped_before_coding() {
        // Shouldn't panic; behavior is implementation-defined but must be deterministic.
        let a = double_metaphone("café");
        let b = double_metaphone("café");
        assert_eq!(a, b);
    }
}
