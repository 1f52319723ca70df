// src/services/csv_codec.rs
//
// CSV do elenco. Uma única tabela de colunas descreve o cabeçalho, como
// escrever cada célula na exportação e como aplicá-la na importação.

use uuid::Uuid;

use crate::models::player::{Player, PlayerInput, SkillPatch};

struct Column {
    header: &'static str,
    write: fn(&Player) -> String,
    apply: fn(&mut PlayerInput, &str),
}

const COLUMNS: &[Column] = &[
    Column {
        header: "ID",
        write: |p| p.id.to_string(),
        // id inválido é ignorado: a linha vira um cadastro novo
        apply: |p, v| p.id = Uuid::parse_str(v).ok(),
    },
    Column {
        header: "Name",
        write: |p| quote(&p.name),
        apply: |p, v| p.name = non_empty(v),
    },
    Column {
        header: "Position",
        write: |p| quote(p.position.as_deref().unwrap_or_default()),
        apply: |p, v| p.position = non_empty(v),
    },
    Column {
        header: "Age",
        write: |p| p.age.map(|a| a.to_string()).unwrap_or_default(),
        apply: |p, v| p.age = Some(leading_int(v)),
    },
    Column {
        header: "Nationality",
        write: |p| quote(p.nationality.as_deref().unwrap_or_default()),
        apply: |p, v| p.nationality = non_empty(v),
    },
    Column {
        header: "Goals",
        write: |p| p.goals.to_string(),
        apply: |p, v| p.goals = Some(leading_int(v)),
    },
    Column {
        header: "Assists",
        write: |p| p.assists.to_string(),
        apply: |p, v| p.assists = Some(leading_int(v)),
    },
    Column {
        header: "Minutes",
        write: |p| p.minutes.to_string(),
        apply: |p, v| p.minutes = Some(leading_int(v)),
    },
    Column {
        header: "Fitness",
        write: |p| p.fitness.to_string(),
        apply: |p, v| p.fitness = Some(leading_int(v)),
    },
    Column {
        header: "Technical Skills",
        write: |p| p.skills.technical.to_string(),
        apply: |p, v| skills(p).technical = Some(leading_int(v)),
    },
    Column {
        header: "Physical Skills",
        write: |p| p.skills.physical.to_string(),
        apply: |p, v| skills(p).physical = Some(leading_int(v)),
    },
    Column {
        header: "Tactical Skills",
        write: |p| p.skills.tactical.to_string(),
        apply: |p, v| skills(p).tactical = Some(leading_int(v)),
    },
    Column {
        header: "Mental Skills",
        write: |p| p.skills.mental.to_string(),
        apply: |p, v| skills(p).mental = Some(leading_int(v)),
    },
    Column {
        header: "Medical Clearance",
        write: |p| (if p.medical_clearance { "Yes" } else { "No" }).to_string(),
        apply: |p, v| p.medical_clearance = Some(v.eq_ignore_ascii_case("yes")),
    },
    Column {
        header: "Notes",
        write: |p| quote(p.notes.as_deref().unwrap_or_default()),
        apply: |p, v| p.notes = non_empty(v),
    },
];

/// Resultado do parse: linhas aproveitáveis e quantas foram descartadas
/// por não terem nome.
#[derive(Debug, Default)]
pub struct ParsedCsv {
    pub players: Vec<PlayerInput>,
    pub skipped: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CsvError {
    /// Menos de duas linhas não vazias (cabeçalho + pelo menos um jogador).
    Empty,
}

pub fn header_line() -> String {
    COLUMNS.iter().map(|c| c.header).collect::<Vec<_>>().join(",")
}

pub fn export_players(players: &[Player]) -> String {
    let mut lines = Vec::with_capacity(players.len() + 1);
    lines.push(header_line());
    for player in players {
        let cells: Vec<String> = COLUMNS.iter().map(|c| (c.write)(player)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

pub fn parse_players(text: &str) -> Result<ParsedCsv, CsvError> {
    let mut records = split_records(text).into_iter().filter(|r| !is_blank(r));

    let header = records.next().ok_or(CsvError::Empty)?;
    let rows: Vec<Vec<String>> = records.collect();
    if rows.is_empty() {
        return Err(CsvError::Empty);
    }

    // Cabeçalhos desconhecidos viram `None` e são ignorados
    let columns: Vec<Option<&Column>> = header
        .iter()
        .map(|h| COLUMNS.iter().find(|c| c.header.eq_ignore_ascii_case(h)))
        .collect();

    let mut parsed = ParsedCsv::default();
    for values in rows {
        let mut input = PlayerInput::default();
        for (index, column) in columns.iter().enumerate() {
            if let Some(column) = column {
                let value = values.get(index).map(String::as_str).unwrap_or_default();
                (column.apply)(&mut input, value);
            }
        }

        if input.name.is_some() {
            parsed.players.push(input);
        } else {
            parsed.skipped += 1;
        }
    }

    Ok(parsed)
}

/// Interpreta o prefixo numérico da célula ("12abc" → 12). Sem dígitos, 0.
pub fn leading_int(value: &str) -> i32 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let magnitude = digits[..end]
        .bytes()
        .fold(0i64, |acc, d| (acc * 10 + i64::from(d - b'0')).min(i64::from(i32::MAX) + 1));

    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[derive(Default)]
struct CellBuf {
    text: String,
    quoted: bool,
    // fim do conteúdo entre aspas; o que vem depois é descartado
    quoted_end: Option<usize>,
}

impl CellBuf {
    fn finish(&mut self) -> String {
        let cell = std::mem::take(self);
        if cell.quoted {
            let mut text = cell.text;
            if let Some(end) = cell.quoted_end {
                text.truncate(end);
            }
            text
        } else {
            cell.text.trim().to_string()
        }
    }
}

// Divide o texto em registros e células respeitando aspas: vírgulas e
// quebras de linha entre aspas fazem parte da célula, `""` é uma aspa
// literal. Só células sem aspas são aparadas.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut cell = CellBuf::default();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    cell.text.push('"');
                    chars.next();
                }
                '"' => {
                    in_quotes = false;
                    cell.quoted_end = Some(cell.text.len());
                }
                _ => cell.text.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                // aspa no início da célula: espaços antes dela não contam
                if !cell.quoted && cell.text.trim().is_empty() {
                    cell.text.clear();
                    cell.quoted = true;
                }
                in_quotes = true;
            }
            ',' => record.push(cell.finish()),
            '\n' => {
                record.push(cell.finish());
                records.push(std::mem::take(&mut record));
            }
            '\r' => {}
            _ => cell.text.push(c),
        }
    }
    record.push(cell.finish());
    records.push(record);
    records
}

fn is_blank(record: &[String]) -> bool {
    matches!(record, [only] if only.is_empty())
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

// Só a nota presente na linha é preenchida
fn skills(input: &mut PlayerInput) -> &mut SkillPatch {
    input.skills.get_or_insert_with(SkillPatch::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::SkillRatings;
    use chrono::Utc;

    fn player(name: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            team_id: None,
            name: name.to_string(),
            jersey_number: Some(9),
            position: Some("Forward".to_string()),
            age: Some(24),
            nationality: Some("Brazil".to_string()),
            birth_date: None,
            goals: 12,
            assists: 7,
            minutes: 1530,
            yellow_cards: 2,
            red_cards: 0,
            shots: 40,
            passes: 300,
            duels_won: 55,
            skills: SkillRatings { technical: 81, physical: 74, tactical: 68, mental: 77 },
            fitness: 92,
            medical_clearance: true,
            injuries: Vec::new(),
            notes: Some("Said \"ready\", plays wide, left foot".to_string()),
            photo_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn header_matches_column_order() {
        assert_eq!(
            header_line(),
            "ID,Name,Position,Age,Nationality,Goals,Assists,Minutes,Fitness,Technical Skills,\
             Physical Skills,Tactical Skills,Mental Skills,Medical Clearance,Notes"
        );
    }

    #[test]
    fn export_then_import_keeps_fields() {
        let original = player("João \"Jo\" Silva");
        let csv = export_players(std::slice::from_ref(&original));
        let parsed = parse_players(&csv).unwrap();

        assert_eq!(parsed.skipped, 0);
        let back = &parsed.players[0];
        assert_eq!(back.id, Some(original.id));
        assert_eq!(back.name.as_deref(), Some("João \"Jo\" Silva"));
        assert_eq!(back.position.as_deref(), Some("Forward"));
        assert_eq!(back.age, Some(24));
        assert_eq!(back.goals, Some(12));
        assert_eq!(back.assists, Some(7));
        assert_eq!(back.minutes, Some(1530));
        assert_eq!(back.fitness, Some(92));
        assert_eq!(back.skills, Some(original.skills.into()));
        assert_eq!(back.medical_clearance, Some(true));
        assert_eq!(back.notes, original.notes);
    }

    #[test]
    fn nameless_rows_are_dropped_and_counted() {
        let csv = "Name,Goals\nAna,3\n,5\n\nBia,1\n   \n\"\",2\n";
        let parsed = parse_players(csv).unwrap();
        assert_eq!(parsed.players.len(), 2);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn non_numeric_cells_become_zero() {
        let parsed = parse_players("name,goals,age,fitness\nAna,abc,12abc,\n").unwrap();
        let ana = &parsed.players[0];
        assert_eq!(ana.goals, Some(0));
        assert_eq!(ana.age, Some(12));
        assert_eq!(ana.fitness, Some(0));
    }

    #[test]
    fn headers_are_case_insensitive_and_unknown_ones_ignored() {
        let csv = "NAME,Shoe Size,medical clearance,TECHNICAL SKILLS\r\nAna,42,YES,70\r\nBia,40,no,x";
        let parsed = parse_players(csv).unwrap();
        assert_eq!(parsed.players[0].medical_clearance, Some(true));
        assert_eq!(parsed.players[0].skills.and_then(|s| s.technical), Some(70));
        assert_eq!(parsed.players[1].medical_clearance, Some(false));
        assert_eq!(parsed.players[1].skills.and_then(|s| s.technical), Some(0));
    }

    #[test]
    fn header_only_file_is_rejected() {
        assert_eq!(parse_players("Name,Goals\n\n").unwrap_err(), CsvError::Empty);
        assert_eq!(parse_players("").unwrap_err(), CsvError::Empty);
    }

    #[test]
    fn leading_int_follows_prefix_rules() {
        assert_eq!(leading_int("  42 "), 42);
        assert_eq!(leading_int("-7x"), -7);
        assert_eq!(leading_int("+3"), 3);
        assert_eq!(leading_int(""), 0);
        assert_eq!(leading_int("x1"), 0);
        assert_eq!(leading_int("99999999999"), i32::MAX);
    }

    #[test]
    fn invalid_id_means_create() {
        let parsed = parse_players("ID,Name\nnot-a-uuid,Ana\n").unwrap();
        assert_eq!(parsed.players[0].id, None);
    }

    #[test]
    fn single_skill_column_leaves_other_ratings_unset() {
        let id = Uuid::new_v4();
        let parsed = parse_players(&format!("ID,Name,Technical Skills\n{id},Ana,70\n")).unwrap();
        let skills = parsed.players[0].skills.unwrap();
        assert_eq!(skills.technical, Some(70));
        assert_eq!(skills.physical, None);
        assert_eq!(skills.tactical, None);
        assert_eq!(skills.mental, None);
    }

    #[test]
    fn quoted_whitespace_and_line_breaks_survive_round_trip() {
        let mut original = player("  Ana  ");
        original.notes = Some("line one\nline two, still notes".to_string());
        let csv = export_players(std::slice::from_ref(&original));
        let parsed = parse_players(&csv).unwrap();

        assert_eq!(parsed.players.len(), 1);
        assert_eq!(parsed.skipped, 0);
        let back = &parsed.players[0];
        assert_eq!(back.name.as_deref(), Some("  Ana  "));
        assert_eq!(back.notes, original.notes);
        assert_eq!(back.medical_clearance, Some(true));
    }

    #[test]
    fn unquoted_cells_are_trimmed() {
        let parsed = parse_players("Name , Goals\n  Bia  ,  4 \r\n").unwrap();
        assert_eq!(parsed.players[0].name.as_deref(), Some("Bia"));
        assert_eq!(parsed.players[0].goals, Some(4));
    }
}
