//! Show script parsing.
//!
//! A script is a whitespace-separated token stream. The first two tokens
//! name the song and the backdrop; the rest is a sequence of records, each
//! opened by an integer `loops`. `loops > 1` reads that many firework
//! records into one synchronized volley, anything else reads a single solo
//! record. A firework record is, in order: particle count, position x y,
//! velocity x y, acceleration x y, particle size, color r g b.
//!
//! `#` starts a comment running to end of line.

use crate::error::ScriptError;
use crate::sim::FireworkSpec;

#[derive(Debug, Clone, PartialEq)]
pub enum ShowEntry {
    /// One firework that launches and bursts on its own.
    Solo(FireworkSpec),
    /// Several fireworks driven through one choreographed frame loop.
    Volley(Vec<FireworkSpec>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowScript {
    pub song: String,
    pub backdrop: String,
    pub entries: Vec<ShowEntry>,
}

/// Parse a whole script.
pub fn parse(text: &str) -> Result<ShowScript, ScriptError> {
    let mut tokens = Tokens::new(text);
    let song = tokens.next_token("song identifier")?.to_string();
    let backdrop = tokens.next_token("backdrop identifier")?.to_string();

    let mut entries = Vec::new();
    while !tokens.finished() {
        let loops = tokens.next_int("volley size")?;
        if loops > 1 {
            let mut specs = Vec::with_capacity(loops as usize);
            for _ in 0..loops {
                specs.push(parse_record(&mut tokens)?);
            }
            entries.push(ShowEntry::Volley(specs));
        } else {
            entries.push(ShowEntry::Solo(parse_record(&mut tokens)?));
        }
    }

    Ok(ShowScript {
        song,
        backdrop,
        entries,
    })
}

fn parse_record(tokens: &mut Tokens<'_>) -> Result<FireworkSpec, ScriptError> {
    let count = tokens.next_int("particle count")?;
    if count < 1 {
        return Err(ScriptError::ParticleCount {
            value: count,
            index: tokens.index(),
        });
    }
    Ok(FireworkSpec {
        count: count as usize,
        px: tokens.next_real("position x")?,
        py: tokens.next_real("position y")?,
        vx: tokens.next_real("velocity x")?,
        vy: tokens.next_real("velocity y")?,
        ax: tokens.next_real("acceleration x")?,
        ay: tokens.next_real("acceleration y")?,
        size: tokens.next_real("particle size")?,
        r: tokens.next_real("red channel")?,
        g: tokens.next_real("green channel")?,
        b: tokens.next_real("blue channel")?,
    })
}

/// Token cursor with 1-based position tracking for error messages.
struct Tokens<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(|line| line.split_whitespace())
            .collect();
        Tokens { tokens, pos: 0 }
    }

    fn finished(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// 1-based index of the most recently consumed token.
    fn index(&self) -> usize {
        self.pos
    }

    fn next_token(&mut self, expected: &'static str) -> Result<&'a str, ScriptError> {
        let tok = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(ScriptError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(tok)
    }

    fn next_int(&mut self, expected: &'static str) -> Result<i64, ScriptError> {
        let tok = self.next_token(expected)?;
        tok.parse().map_err(|_| ScriptError::Malformed {
            expected,
            token: tok.to_string(),
            index: self.pos,
        })
    }

    fn next_real(&mut self, expected: &'static str) -> Result<f64, ScriptError> {
        let tok = self.next_token(expected)?;
        tok.parse().map_err(|_| ScriptError::Malformed {
            expected,
            token: tok.to_string(),
            index: self.pos,
        })
    }
}
