use counter::make_counter;

use super::run_context::RunContext;

/// The fixed counter sequence: two counters seeded with -5 and 200, three
/// calls on the first and one on the second, printing `x y z`.
pub fn run_demo(context: &mut dyn RunContext) {
    let mut inc1 = make_counter(-5);
    let z = inc1();
    let mut inc2 = make_counter(200);
    let mut x = inc1();
    debug_assert_eq!(x, -3);
    x = inc1();
    let y = inc2();
    context.print(&format!("{} {} {}", x, y, z));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_context::TestContext;

    #[test]
    fn prints_the_fixed_sequence() {
        let mut ctx = TestContext::new();
        run_demo(&mut ctx);
        assert_eq!(ctx.print, "-2 201 -4\n");
    }
}
