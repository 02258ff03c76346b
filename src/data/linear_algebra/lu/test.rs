use crate::data::linear_algebra::lu::{RectangularLu, SquareLu};
use crate::data::number_types::rational::Rational;

fn r(n: i64, d: i64) -> Rational {
    Rational::new(n, d)
}

fn matrix(values: &[&[i64]]) -> Vec<Vec<Rational>> {
    values.iter()
        .map(|row| row.iter().map(|&v| Rational::from_integer(v)).collect())
        .collect()
}

#[test]
fn square_solve() {
    let lu = SquareLu::factor(matrix(&[&[2, 1], &[1, 3]])).unwrap();

    let x = lu.solve(&[Rational::from_integer(5), Rational::from_integer(10)]);
    assert_eq!(x, vec![Rational::from_integer(1), Rational::from_integer(3)]);
}

#[test]
fn square_solve_transpose() {
    let a = [[2_i64, 4], [1, 3]];
    let lu = SquareLu::factor(matrix(&[&a[0][..], &a[1][..]])).unwrap();

    let b = [Rational::from_integer(4), Rational::from_integer(7)];
    let x = lu.solve_transpose(&b);
    for j in 0..2 {
        let total = (0..2).map(|i| &r(a[i][j], 1) * &x[i]).sum::<Rational>();
        assert_eq!(total, b[j]);
    }
}

#[test]
fn square_requires_pivoting() {
    // Zero in the leading position forces a row swap.
    let lu = SquareLu::factor(matrix(&[&[0, 1], &[1, 0]])).unwrap();
    let x = lu.solve(&[Rational::from_integer(3), Rational::from_integer(4)]);
    assert_eq!(x, vec![Rational::from_integer(4), Rational::from_integer(3)]);
}

#[test]
fn square_singular() {
    assert!(SquareLu::factor(matrix(&[&[1, 2], &[2, 4]])).is_none());
}

#[test]
fn rectangular_selects_rows() {
    // Three rows, two independent columns; the middle row is a multiple of the first.
    let columns = vec![
        vec![r(1, 1), r(2, 1), r(0, 1)],
        vec![r(2, 1), r(4, 1), r(1, 1)],
    ];
    let factorization = RectangularLu::factor(3, &columns).unwrap();
    let selected = factorization.selected_rows();
    assert_eq!(selected.len(), 2);
    assert!(selected.contains(&0) || selected.contains(&1));
    assert!(selected.contains(&2));

    // S^T d = v must be satisfied by the returned d on the selected rows.
    let v = vec![r(3, 1), r(5, 1)];
    let d = factorization.solve_transpose(&v);
    for (j, column) in columns.iter().enumerate() {
        let total = selected.iter().zip(&d)
            .map(|(&i, d_i)| &column[i] * d_i)
            .sum::<Rational>();
        assert_eq!(total, v[j]);
    }
}

#[test]
fn rectangular_dependent_columns() {
    let columns = vec![
        vec![r(1, 1), r(2, 1)],
        vec![r(2, 1), r(4, 1)],
    ];
    assert!(RectangularLu::factor(2, &columns).is_none());
}
