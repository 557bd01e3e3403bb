//! Immutable typed tables and row filtering

/// Immutable sequence of typed rows
///
/// Accessors hand out owned copies; the stored rows never change after
/// construction.
#[derive(Debug, Clone)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Clone> Table<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Independent copy of every row
    pub fn get(&self) -> Vec<R> {
        self.rows.clone()
    }

    /// Independent copy of the rows matching `predicate`, in table order
    ///
    /// Several criteria combine with `&&` inside the predicate:
    ///
    /// ```
    /// use safra_dash::store::{Criterion, Table};
    ///
    /// let table = Table::new(vec![("MT", 2020), ("MT", 2021), ("GO", 2021)]);
    /// let uf = Criterion::Eq("MT");
    /// let year = Criterion::In(vec![2021, 2022]);
    ///
    /// let rows = table.get_filtered(|(row_uf, row_year)| uf.matches(row_uf) && year.matches(row_year));
    /// assert_eq!(rows, vec![("MT", 2021)]);
    /// ```
    pub fn get_filtered<P>(&self, predicate: P) -> Vec<R>
    where
        P: Fn(&R) -> bool,
    {
        self.rows.iter().filter(|row| predicate(row)).cloned().collect()
    }
}

/// Match condition on one field: equality with a scalar, or membership
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion<T> {
    Eq(T),
    In(Vec<T>),
}

impl<T> Criterion<T> {
    pub fn matches<U>(&self, value: &U) -> bool
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        match self {
            Criterion::Eq(expected) => expected == value,
            Criterion::In(options) => options.iter().any(|option| option == value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        uf: String,
        ano: i64,
    }

    fn row(uf: &str, ano: i64) -> Row {
        Row {
            uf: uf.to_string(),
            ano,
        }
    }

    fn sample() -> Table<Row> {
        Table::new(vec![
            row("MT", 2020),
            row("MT", 2021),
            row("GO", 2021),
            row("PR", 2022),
        ])
    }

    #[test]
    fn test_scalar_criterion_is_subset() {
        let table = sample();
        let all = table.get();
        let criterion = Criterion::Eq(2021);

        let filtered = table.get_filtered(|r| criterion.matches(&r.ano));

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.ano == 2021));
        assert!(filtered.iter().all(|r| all.contains(r)));
        assert!(filtered.len() < all.len());
    }

    #[test]
    fn test_membership_criterion() {
        let table = sample();
        let criterion = Criterion::In(vec!["GO", "PR"]);

        let filtered = table.get_filtered(|r| criterion.matches(&r.uf));

        assert_eq!(filtered, vec![row("GO", 2021), row("PR", 2022)]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let table = sample();
        let uf = Criterion::Eq("MT");
        let ano = Criterion::Eq(2021);

        let filtered = table.get_filtered(|r| uf.matches(&r.uf) && ano.matches(&r.ano));

        assert_eq!(filtered, vec![row("MT", 2021)]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let table = sample();
        let filtered = table.get_filtered(|r| Criterion::Eq("SP").matches(&r.uf));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_get_returns_independent_copy() {
        let table = sample();
        let mut copy = table.get();
        copy[0].ano = 1999;
        copy.clear();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get()[0], row("MT", 2020));
    }
}
