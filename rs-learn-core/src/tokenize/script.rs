use super::{Token, Tokenizer, Tokens};
use crate::error::TokenizeError;

/// Writing-system class of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
	Kanji,
	Hiragana,
	Katakana,
	Latin,
	Digit,
	Space,
	/// Punctuation and anything unclassified; never grouped.
	Other,
}

impl Script {
	fn of(c: char) -> Self {
		match c {
			'\u{3005}'
			| '\u{3006}'
			| '\u{3007}'
			| '\u{3400}'..='\u{4DBF}'
			| '\u{4E00}'..='\u{9FFF}'
			| '\u{F900}'..='\u{FAFF}' => Script::Kanji,
			'\u{3041}'..='\u{309F}' => Script::Hiragana,
			'\u{30A1}'..='\u{30FA}'
			| '\u{30FC}'..='\u{30FF}'
			| '\u{31F0}'..='\u{31FF}'
			| '\u{FF66}'..='\u{FF9F}' => Script::Katakana,
			'0'..='9' | '\u{FF10}'..='\u{FF19}' => Script::Digit,
			'\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}' => Script::Latin,
			c if c.is_whitespace() => Script::Space,
			c if c.is_alphabetic() && !c.is_ascii_punctuation() => Script::Latin,
			_ => Script::Other,
		}
	}

	fn groups(self) -> bool {
		!matches!(self, Script::Other)
	}
}

/// Offline tokenizer that cuts text where the script changes.
///
/// Runs of kanji, hiragana, katakana, latin letters or digits each form one
/// token; every punctuation mark is its own token; whitespace separates
/// tokens and is never emitted. This is a coarse stand-in for a dictionary
/// based morphological analyser.
///
/// Spans always fall on character boundaries, so this tokenizer never
/// yields an `Err` item.
///
/// ```
/// use rs_learn_core::tokenize::{ScriptTokenizer, Tokenizer, TokenKind};
///
/// let surfaces: Vec<String> = ScriptTokenizer
/// 	.tokenize("猫が歩いた。")
/// 	.filter_map(Result::ok)
/// 	.filter(|t| t.kind == TokenKind::Word)
/// 	.map(|t| t.surface)
/// 	.collect();
/// assert_eq!(surfaces, ["猫", "が", "歩", "いた", "。"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTokenizer;

impl Tokenizer for ScriptTokenizer {
	fn tokenize<'a>(&'a self, text: &'a str) -> Tokens<'a> {
		Box::new(ScriptTokens { text, pos: 0, stage: Stage::Begin })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
	Begin,
	Body,
	Done,
}

/// Lazy node sequence over one chunk of text.
struct ScriptTokens<'a> {
	text: &'a str,
	pos: usize,
	stage: Stage,
}

impl ScriptTokens<'_> {
	/// Returns the byte range of the next token starting at or after `pos`.
	fn next_span(&mut self) -> Option<(usize, usize)> {
		let rest = &self.text[self.pos..];
		let mut chars = rest.char_indices().skip_while(|(_, c)| c.is_whitespace());
		let (start, first) = chars.next()?;
		let script = Script::of(first);

		let mut end = start + first.len_utf8();
		if script.groups() {
			for (i, c) in chars {
				if Script::of(c) != script {
					break;
				}
				end = i + c.len_utf8();
			}
		}

		let span = (self.pos + start, self.pos + end);
		self.pos += end;
		Some(span)
	}
}

impl Iterator for ScriptTokens<'_> {
	type Item = Result<Token, TokenizeError>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.stage {
			Stage::Begin => {
				self.stage = Stage::Body;
				Some(Ok(Token::begin()))
			}
			Stage::Body => match self.next_span() {
				Some((start, end)) => Some(Ok(Token::word(&self.text[start..end]))),
				None => {
					self.stage = Stage::Done;
					Some(Ok(Token::end()))
				}
			},
			Stage::Done => None,
		}
	}
}
