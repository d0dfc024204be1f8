//! Recursive-descent parser from tokens to [`Statement`]s.

use super::token::{Token, TokenKind};
use super::{ParseError, Statement};
use crate::ast::*;
use crate::schema::ConstraintType;

/// Statements that own the rest of their batch.
const MODULE_KINDS: &[&str] = &["PROCEDURE", "PROC", "FUNCTION", "TRIGGER", "VIEW"];

/// Words that start a column option.
const OPTION_WORDS: &[&str] = &[
    "IDENTITY",
    "NULL",
    "ROWGUIDCOL",
    "COLLATE",
    "CONSTRAINT",
    "DEFAULT",
    "PRIMARY",
    "UNIQUE",
    "FOREIGN",
    "REFERENCES",
    "CHECK",
];

/// Words that end an operator chain at nesting depth zero.
const CHAIN_STOP_WORDS: &[&str] = &[
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "PERSISTED",
    "CONSTRAINT",
    "PRIMARY",
    "UNIQUE",
    "CHECK",
    "FOREIGN",
    "REFERENCES",
    "DEFAULT",
    "COLLATE",
    "ROWGUIDCOL",
    "IDENTITY",
    "WITH",
    "CREATE",
];

/// Functions whose first argument is a data type.
const TYPE_FIRST_FUNCTIONS: &[&str] = &["CONVERT", "TRY_CONVERT"];

/// Niladic functions written without parentheses.
const NILADIC_FUNCTIONS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "SESSION_USER",
    "SYSTEM_USER",
    "USER",
];

pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    current: usize,
    default_schema: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, tokens: Vec<Token<'a>>, default_schema: &'a str) -> Self {
        Self {
            source,
            tokens,
            current: 0,
            default_schema,
        }
    }

    pub fn statements(mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Semicolon {
                self.current += 1;
            } else if self.at_batch_separator() {
                self.skip_batch_separator();
            } else if self.at_create_table() {
                statements.push(Statement::CreateTable(self.create_table()?));
            } else {
                let sql = self.skip_statement();
                statements.push(Statement::Other { sql });
            }
        }
        Ok(statements)
    }

    // ---- token access ----

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.current).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.current + offset).copied()
    }

    fn peek_or_eof(&self) -> Result<Token<'a>, ParseError> {
        self.peek().ok_or_else(|| {
            let line = self.tokens.last().map_or(1, |token| token.line);
            ParseError::new(line, "unexpected end of input")
        })
    }

    fn previous(&self) -> Option<Token<'a>> {
        self.current
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index).copied())
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() {
            self.current += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn check_word(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_word(keyword))
    }

    fn check_word_at(&self, offset: usize, keyword: &str) -> bool {
        self.peek_at(offset).is_some_and(|token| token.is_word(keyword))
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        let found = self.check(kind);
        if found {
            self.advance();
        }
        found
    }

    fn eat_word(&mut self, keyword: &str) -> bool {
        let found = self.check_word(keyword);
        if found {
            self.advance();
        }
        found
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", what)))
        }
    }

    fn expect_word(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_word(keyword) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {}", keyword)))
        }
    }

    fn error(&self, message: &str) -> ParseError {
        match self.peek() {
            Some(token) => {
                ParseError::new(token.line, format!("{} near '{}'", message, token.text))
            }
            None => {
                let line = self.tokens.last().map_or(1, |token| token.line);
                ParseError::new(line, format!("{} at end of input", message))
            }
        }
    }

    /// Byte offset where the next construct starts.
    fn start(&self) -> usize {
        self.peek().map_or(self.source.len(), |token| token.start)
    }

    /// Source text from `start` through the last consumed token.
    fn text_from(&self, start: usize) -> String {
        let end = self.previous().map_or(start, |token| token.end);
        if end <= start {
            return String::new();
        }
        self.source[start..end].to_string()
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(token) if token.is_identifier() => {
                self.advance();
                Ok(token.identifier())
            }
            _ => Err(self.error("expected identifier")),
        }
    }

    fn identifier_node(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let value = self.identifier()?;
        Ok(Node::Identifier(Identifier {
            value,
            sql: self.text_from(start),
        }))
    }

    /// Consume a balanced parenthesized group starting at the current `(`.
    fn skip_group(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftParen, "(")?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.peek_or_eof()?;
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    /// Consume up to (not including) the `,` or `)` closing a table element.
    fn skip_to_element_end(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Comma | TokenKind::RightParen => return Ok(()),
                TokenKind::LeftParen => self.skip_group()?,
                _ => self.advance(),
            }
        }
        Ok(())
    }

    fn at_element_end(&self) -> bool {
        matches!(
            self.peek().map(|token| token.kind),
            None | Some(TokenKind::Comma) | Some(TokenKind::RightParen)
        )
    }

    // ---- statements ----

    /// `GO` on its own line.
    fn at_batch_separator(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        token.is_word("GO") && self.previous().map_or(true, |previous| previous.line < token.line)
    }

    fn skip_batch_separator(&mut self) {
        let line = self.peek().map(|token| token.line);
        self.advance();
        // GO <count>
        if let Some(token) = self.peek() {
            if token.kind == TokenKind::Integer && Some(token.line) == line {
                self.advance();
            }
        }
    }

    fn at_create_table(&self) -> bool {
        self.check_word("CREATE") && self.check_word_at(1, "TABLE")
    }

    /// `CREATE|ALTER [OR ALTER] PROCEDURE|FUNCTION|TRIGGER|VIEW`
    fn at_module_definition(&self) -> bool {
        if !(self.check_word("CREATE") || self.check_word("ALTER")) {
            return false;
        }
        let offset = if self.check_word_at(1, "OR") && self.check_word_at(2, "ALTER") {
            3
        } else {
            1
        };
        self.peek_at(offset)
            .is_some_and(|token| token.is_any_word(MODULE_KINDS))
    }

    /// Skip a statement the extractor has no use for and return its text.
    ///
    /// Module definitions run to the end of their batch. Anything else stops
    /// at a top-level `;`, a batch separator or the next `CREATE`.
    fn skip_statement(&mut self) -> String {
        let start = self.start();
        if self.at_module_definition() {
            while self.peek().is_some() && !self.at_batch_separator() {
                self.advance();
            }
            return self.text_from(start);
        }

        self.advance();
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if depth == 0
                && (token.kind == TokenKind::Semicolon
                    || self.at_batch_separator()
                    || token.is_word("CREATE"))
            {
                break;
            }
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
        self.text_from(start)
    }

    fn create_table(&mut self) -> Result<CreateTableStatement, ParseError> {
        let start = self.start();
        self.expect_word("CREATE")?;
        self.expect_word("TABLE")?;
        let (schema_name, object_name) = self.table_name()?;
        let definition = self.table_definition()?;
        self.table_options()?;

        Ok(CreateTableStatement {
            schema_name,
            object_name,
            source_text: self.text_from(start),
            definition,
        })
    }

    /// `[[server.]database.][schema.]name`, parts may be empty (`db..t`).
    fn table_name(&mut self) -> Result<(String, String), ParseError> {
        let mut parts = vec![self.identifier()?];
        while self.eat(TokenKind::Dot) {
            if self.check(TokenKind::Dot) {
                parts.push(String::new());
                continue;
            }
            parts.push(self.identifier()?);
        }
        if parts.len() > 4 {
            return Err(self.error("too many name parts in table name"));
        }

        let object_name = parts.pop().unwrap_or_default();
        let schema_name = parts
            .pop()
            .filter(|schema| !schema.is_empty())
            .unwrap_or_else(|| self.default_schema.to_string());
        Ok((schema_name, object_name))
    }

    /// `ON fg`, `TEXTIMAGE_ON fg`, `WITH (...)`, `AS FILETABLE` after the element list.
    fn table_options(&mut self) -> Result<(), ParseError> {
        loop {
            if self.check_word("ON")
                || self.check_word("TEXTIMAGE_ON")
                || self.check_word("FILESTREAM_ON")
            {
                self.advance();
                if self.peek().is_some_and(|token| {
                    token.is_identifier() || token.kind == TokenKind::String
                }) {
                    self.advance();
                }
                if self.check(TokenKind::LeftParen) {
                    self.skip_group()?;
                }
            } else if self.check_word("WITH")
                && self
                    .peek_at(1)
                    .is_some_and(|token| token.kind == TokenKind::LeftParen)
            {
                self.advance();
                self.skip_group()?;
            } else if self.check_word("AS")
                && self
                    .peek_at(1)
                    .is_some_and(|token| token.is_any_word(&["FILETABLE", "NODE", "EDGE"]))
            {
                self.advance();
                self.advance();
            } else {
                return Ok(());
            }
        }
    }

    // ---- table elements ----

    fn table_definition(&mut self) -> Result<TableDefinition, ParseError> {
        let start = self.start();
        self.expect(TokenKind::LeftParen, "(")?;
        let mut children = Vec::new();
        loop {
            self.table_element(&mut children)?;
            if !self.eat(TokenKind::Comma) || self.check(TokenKind::RightParen) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, ")")?;

        Ok(TableDefinition {
            children,
            sql: self.text_from(start),
        })
    }

    fn table_element(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        let token = self.peek_or_eof()?;
        let node = if token.is_any_word(&["CONSTRAINT", "PRIMARY", "UNIQUE", "FOREIGN", "CHECK"])
        {
            children.push(self.table_constraint()?);
            if self.at_element_end() {
                return Ok(());
            }
            // e.g. table level DEFAULT ... FOR column
            self.unknown_element("ConstraintOption")?
        } else if token.is_word("INDEX") {
            self.unknown_element("IndexDefinition")?
        } else if token.is_word("PERIOD") && self.check_word_at(1, "FOR") {
            self.unknown_element("PeriodDefinition")?
        } else {
            self.column_element()?
        };
        children.push(node);
        Ok(())
    }

    fn unknown_element(&mut self, type_name: &str) -> Result<Node, ParseError> {
        let start = self.start();
        self.skip_to_element_end()?;
        Ok(Node::unknown(type_name, self.text_from(start)))
    }

    fn table_constraint(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let name = if self.eat_word("CONSTRAINT") {
            Some(self.identifier_node()?)
        } else {
            None
        };

        match self.constraint(start, name)? {
            Some(node) => Ok(node),
            None => {
                self.skip_to_element_end()?;
                Ok(Node::unknown("ConstraintDefinition", self.text_from(start)))
            }
        }
    }

    fn column_element(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let name = self.identifier_node()?;

        if self.check_word("AS") {
            return self.computed_column(start, name);
        }

        let mut children = vec![name];
        if !self.at_element_end() && !self.at_column_option() {
            children.push(Node::DataType(self.data_type()?));
        }
        self.column_options(&mut children)?;

        Ok(Node::ColumnDefinition(ColumnDefinition {
            children,
            sql: self.text_from(start),
        }))
    }

    fn computed_column(&mut self, start: usize, name: Node) -> Result<Node, ParseError> {
        self.expect_word("AS")?;
        let expression = self.expression()?;
        let mut children = vec![name, expression];

        self.eat_word("PERSISTED");
        self.column_options(&mut children)?;

        Ok(Node::ComputedColumnDefinition(ComputedColumnDefinition {
            children,
            sql: self.text_from(start),
        }))
    }

    fn at_column_option(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        token.is_any_word(OPTION_WORDS) || (token.is_word("NOT") && self.check_word_at(1, "NULL"))
    }

    fn column_options(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        while !self.at_element_end() {
            children.push(self.column_option()?);
        }
        Ok(())
    }

    fn column_option(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let token = self.peek_or_eof()?;

        if token.is_word("IDENTITY") {
            self.advance();
            if self.check(TokenKind::LeftParen) {
                self.skip_group()?;
            }
            self.eat_not_for_replication();
            return Ok(Node::ColumnIdentity(Marker {
                sql: self.text_from(start),
            }));
        }
        if token.is_word("NULL") {
            self.advance();
            return Ok(self.constraint_node(ConstraintType::Null, start));
        }
        if token.is_word("NOT") && self.check_word_at(1, "NULL") {
            self.advance();
            self.advance();
            return Ok(self.constraint_node(ConstraintType::NotNull, start));
        }
        if token.is_word("ROWGUIDCOL") {
            self.advance();
            return Ok(self.constraint_node(ConstraintType::RowGuidCol, start));
        }
        if token.is_word("COLLATE") {
            self.advance();
            self.identifier()?;
            return Ok(Node::Collation(Marker {
                sql: self.text_from(start),
            }));
        }

        let name = if self.eat_word("CONSTRAINT") {
            Some(self.identifier_node()?)
        } else {
            None
        };
        if let Some(node) = self.constraint(start, name)? {
            return Ok(node);
        }
        self.unknown_option(start)
    }

    /// Anything else (`SPARSE`, `FILESTREAM`, `MASKED WITH (...)`, ...) up to
    /// the next recognised option.
    fn unknown_option(&mut self, start: usize) -> Result<Node, ParseError> {
        if self.check(TokenKind::LeftParen) {
            self.skip_group()?;
        } else {
            self.advance();
        }
        while !self.at_element_end() && !self.at_column_option() {
            if self.check(TokenKind::LeftParen) {
                self.skip_group()?;
            } else {
                self.advance();
            }
        }
        Ok(Node::unknown("ColumnOption", self.text_from(start)))
    }

    fn constraint_node(&self, kind: ConstraintType, start: usize) -> Node {
        Node::Constraint(Constraint {
            kind,
            sql: self.text_from(start),
        })
    }

    fn eat_not_for_replication(&mut self) -> bool {
        let found = self.check_word("NOT")
            && self.check_word_at(1, "FOR")
            && self.check_word_at(2, "REPLICATION");
        if found {
            self.current += 3;
        }
        found
    }

    /// A constraint body, column or table level. `name` is the already
    /// consumed `CONSTRAINT name`, if any.
    fn constraint(&mut self, start: usize, name: Option<Node>) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.peek() else {
            return match name {
                Some(_) => Err(self.error("expected constraint")),
                None => Ok(None),
            };
        };

        if token.is_word("PRIMARY") {
            self.advance();
            self.expect_word("KEY")?;
            let mut children: Vec<Node> = name.into_iter().collect();
            self.index_tail(&mut children)?;
            return Ok(Some(Node::PrimaryKeyConstraint(PrimaryKeyConstraint {
                children,
                sql: self.text_from(start),
            })));
        }

        let kind = if token.is_word("DEFAULT") {
            self.advance();
            self.expression()?;
            if self.check_word("WITH") && self.check_word_at(1, "VALUES") {
                self.current += 2;
            }
            ConstraintType::Default
        } else if token.is_word("UNIQUE") {
            self.advance();
            self.index_tail(&mut Vec::new())?;
            ConstraintType::Unique
        } else if token.is_word("FOREIGN") {
            self.advance();
            self.expect_word("KEY")?;
            if self.check(TokenKind::LeftParen) {
                self.skip_group()?;
            }
            self.expect_word("REFERENCES")?;
            self.references_tail()?;
            ConstraintType::ForeignKey
        } else if token.is_word("REFERENCES") {
            self.advance();
            self.references_tail()?;
            ConstraintType::ForeignKey
        } else if token.is_word("CHECK") {
            self.advance();
            self.eat_not_for_replication();
            self.skip_group()?;
            ConstraintType::Check
        } else if name.is_some() {
            return Err(self.error("expected constraint"));
        } else {
            return Ok(None);
        };

        Ok(Some(self.constraint_node(kind, start)))
    }

    /// `[CLUSTERED|NONCLUSTERED [HASH]] [(col [ASC|DESC], ...)] [WITH (...)] [ON fg]`
    fn index_tail(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        if !self.eat_word("CLUSTERED") && self.eat_word("NONCLUSTERED") {
            // memory-optimized tables
            self.eat_word("HASH");
        }
        if self.check(TokenKind::LeftParen) {
            self.indexed_columns(children)?;
        }
        loop {
            let start = self.start();
            if self.eat_word("WITH") {
                if self.check(TokenKind::LeftParen) {
                    self.skip_group()?;
                } else {
                    // legacy `WITH FILLFACTOR = n`
                    self.identifier()?;
                    if self.peek().is_some_and(|token| token.is_operator("=")) {
                        self.advance();
                    }
                    self.advance();
                }
            } else if self.eat_word("ON") {
                self.identifier()?;
                if self.check(TokenKind::LeftParen) {
                    self.skip_group()?;
                }
            } else {
                return Ok(());
            }
            children.push(Node::IndexOption(Marker {
                sql: self.text_from(start),
            }));
        }
    }

    fn indexed_columns(&mut self, children: &mut Vec<Node>) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftParen, "(")?;
        loop {
            let start = self.start();
            let name = self.identifier()?;
            if !self.eat_word("ASC") {
                self.eat_word("DESC");
            }
            children.push(Node::IndexedColumn(IndexedColumn {
                name,
                sql: self.text_from(start),
            }));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RightParen, ")")
    }

    /// `table [(cols)] [ON DELETE|UPDATE action]... [NOT FOR REPLICATION]`
    fn references_tail(&mut self) -> Result<(), ParseError> {
        self.identifier()?;
        while self.eat(TokenKind::Dot) {
            self.identifier()?;
        }
        if self.check(TokenKind::LeftParen) {
            self.skip_group()?;
        }
        loop {
            if self.check_word("ON")
                && (self.check_word_at(1, "DELETE") || self.check_word_at(1, "UPDATE"))
            {
                self.current += 2;
                if self.eat_word("NO") {
                    self.expect_word("ACTION")?;
                } else if self.eat_word("SET") {
                    if !self.eat_word("NULL") {
                        self.expect_word("DEFAULT")?;
                    }
                } else {
                    self.expect_word("CASCADE")?;
                }
            } else if !self.eat_not_for_replication() {
                return Ok(());
            }
        }
    }

    // ---- data types ----

    fn data_type(&mut self) -> Result<DataTypeSpecification, ParseError> {
        let start = self.start();
        let mut object_name = self.identifier()?;
        let mut schema_name = None;
        while self.eat(TokenKind::Dot) {
            schema_name = Some(std::mem::replace(&mut object_name, self.identifier()?));
        }

        let mut specification = DataTypeSpecification {
            object_identifier: ObjectIdentifier {
                schema_name,
                object_name,
            },
            ..Default::default()
        };

        if self.check(TokenKind::LeftParen) {
            let checkpoint = self.current;
            match self.type_arguments() {
                Some((argument1, argument2, is_maximum)) => {
                    specification.argument1 = argument1;
                    specification.argument2 = argument2;
                    specification.is_maximum = is_maximum;
                }
                None => {
                    // e.g. XML(CONTENT dbo.Schema)
                    self.current = checkpoint;
                    self.skip_group()?;
                }
            }
        }

        specification.sql = self.text_from(start);
        Ok(specification)
    }

    /// `(n)`, `(n, m)` or `(MAX)`.
    fn type_arguments(&mut self) -> Option<(Option<u32>, Option<u32>, bool)> {
        if !self.eat(TokenKind::LeftParen) {
            return None;
        }
        let mut arguments = Vec::new();
        let mut is_maximum = false;
        loop {
            let token = self.peek()?;
            if token.is_word("MAX") {
                is_maximum = true;
            } else if token.kind == TokenKind::Integer {
                arguments.push(token.text.parse::<u32>().ok()?);
            } else {
                return None;
            }
            self.advance();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if !self.eat(TokenKind::RightParen) || arguments.len() > 2 {
            return None;
        }
        Some((arguments.first().copied(), arguments.get(1).copied(), is_maximum))
    }

    // ---- expressions ----

    /// A primary expression, or an Unknown node when operators follow it.
    fn expression(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let primary = self.primary()?;
        if self.at_operator_continuation() {
            self.skip_operator_chain();
            return Ok(Node::unknown("BinaryExpression", self.text_from(start)));
        }
        Ok(primary)
    }

    fn at_operator_continuation(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        if token.kind == TokenKind::Operator {
            return true;
        }
        if token.is_any_word(&["AND", "OR", "IS", "IN", "LIKE", "BETWEEN"]) {
            return true;
        }
        token.is_word("NOT")
            && self
                .peek_at(1)
                .is_some_and(|next| next.is_any_word(&["IN", "LIKE", "BETWEEN"]))
    }

    /// Consume the rest of an operator chain such as `+ [b] * 2` or
    /// `IS NOT NULL AND x IN (1, 2)`.
    fn skip_operator_chain(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if depth == 0 {
                if matches!(
                    token.kind,
                    TokenKind::Comma | TokenKind::RightParen | TokenKind::Semicolon
                ) || self.at_batch_separator()
                    || token.is_any_word(CHAIN_STOP_WORDS)
                {
                    return;
                }
                let after_is = self.previous().is_some_and(|previous| previous.is_word("IS"));
                if token.is_word("NOT") && self.check_word_at(1, "NULL") && !after_is {
                    return;
                }
                if token.is_word("NULL") && !self.previous().is_some_and(continues_into_null) {
                    return;
                }
            }

            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth = depth.saturating_sub(1),
                _ if token.is_word("CASE") => depth += 1,
                _ if token.is_word("END") => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let token = self.peek_or_eof()?;

        if let Some(literal_type) = token.kind.literal_type() {
            self.advance();
            return Ok(Node::Literal(Literal {
                literal_type,
                value: token.literal_value(),
                sql: token.text.to_string(),
            }));
        }

        match token.kind {
            TokenKind::LeftParen => {
                if self.check_word_at(1, "SELECT") {
                    self.skip_group()?;
                    return Ok(Node::unknown("SubqueryExpression", self.text_from(start)));
                }
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RightParen, ")")?;
                Ok(inner)
            }
            TokenKind::Variable => {
                self.advance();
                Ok(Node::unknown("VariableExpression", token.text))
            }
            TokenKind::Operator if matches!(token.text, "-" | "+" | "~") => {
                self.advance();
                self.primary()?;
                Ok(Node::unknown("UnaryExpression", self.text_from(start)))
            }
            TokenKind::Word if token.is_word("NULL") => {
                self.advance();
                Ok(Node::Literal(Literal {
                    literal_type: LiteralType::Null,
                    value: token.text.to_string(),
                    sql: token.text.to_string(),
                }))
            }
            TokenKind::Word if token.is_word("CASE") => self.case_expression(),
            TokenKind::Word if token.is_word("NOT") => {
                self.advance();
                self.expression()?;
                Ok(Node::unknown("NotExpression", self.text_from(start)))
            }
            TokenKind::Word
                if token.is_any_word(NILADIC_FUNCTIONS)
                    && !self.peek_at(1).is_some_and(|t| t.kind == TokenKind::LeftParen) =>
            {
                self.advance();
                Ok(Node::FunctionCall(FunctionCall {
                    function_name: token.text.to_string(),
                    arguments: Vec::new(),
                    sql: token.text.to_string(),
                }))
            }
            TokenKind::Word | TokenKind::QuotedIdentifier => self.column_or_function(),
            _ => Err(self.error("expected expression")),
        }
    }

    fn column_or_function(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        let mut names = vec![self.identifier()?];
        while self.check(TokenKind::Dot) && self.peek_at(1).is_some_and(|t| t.is_identifier()) {
            self.advance();
            names.push(self.identifier()?);
        }

        if self.check(TokenKind::LeftParen) {
            if names.len() == 1 {
                let name = names.remove(0);
                return self.function_call(start, name);
            }
            self.skip_group()?;
            return Ok(Node::unknown(
                "UserDefinedFunctionCallExpression",
                self.text_from(start),
            ));
        }

        let column_name = names.pop().unwrap_or_default();
        Ok(Node::ColumnRef(ColumnRef {
            column_name,
            sql: self.text_from(start),
        }))
    }

    fn function_call(&mut self, start: usize, function_name: String) -> Result<Node, ParseError> {
        let upper = function_name.to_uppercase();
        if upper == "CAST" {
            self.skip_group()?;
            return Ok(Node::unknown("CastExpression", self.text_from(start)));
        }
        if self.check_word_at(1, "SELECT") {
            self.skip_group()?;
            return Ok(Node::unknown("SubqueryExpression", self.text_from(start)));
        }

        self.expect(TokenKind::LeftParen, "(")?;
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let type_first = TYPE_FIRST_FUNCTIONS.contains(&upper.as_str());
                let argument = if arguments.is_empty() && type_first {
                    Node::DataType(self.data_type()?)
                } else {
                    self.expression()?
                };
                arguments.push(argument);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, ")")?;

        Ok(Node::FunctionCall(FunctionCall {
            function_name,
            arguments,
            sql: self.text_from(start),
        }))
    }

    /// `CASE [operand] WHEN .. THEN .. [...] [ELSE ..] END`
    fn case_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.start();
        self.expect_word("CASE")?;

        let operand = if self.check_word("WHEN") || self.check_word("END") {
            None
        } else {
            Some(Box::new(self.expression()?))
        };

        let mut when_clauses = Vec::new();
        while self.check_word("WHEN") {
            let clause_start = self.start();
            self.advance();
            let when = self.expression()?;
            self.expect_word("THEN")?;
            let then = self.expression()?;
            when_clauses.push(WhenClause {
                when,
                then,
                sql: self.text_from(clause_start),
            });
        }

        let else_result = if self.eat_word("ELSE") {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.expect_word("END")?;

        Ok(Node::Case(CaseExpression {
            operand,
            when_clauses,
            else_result,
            sql: self.text_from(start),
        }))
    }
}

/// Whether `NULL` after this token belongs to the expression (`IS NULL`, `= NULL`).
fn continues_into_null(previous: Token<'_>) -> bool {
    matches!(
        previous.kind,
        TokenKind::Operator | TokenKind::LeftParen | TokenKind::Comma
    ) || previous.is_any_word(&["IS", "NOT", "AND", "OR", "IN", "LIKE", "THEN", "ELSE"])
}
