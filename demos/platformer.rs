use std::cell::Cell;
use std::rc::Rc;

use tilestep::*;

fn main() {
    let map = TileGrid::from_ascii(&[
        "##########",
        "#........#",
        "#........#",
        "#....##..#",
        "#........#",
        "##########",
    ]);

    let config = BodyConfig {
        tile_size: 16,
        ..Default::default()
    };
    let query = |x: i32, y: i32| map.is_solid(x, y);
    let mut player = match SimpleBody::with_config(2, 1, &config, query) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("bad config: {e}");
            return;
        }
    };

    let hits = Rc::new(Cell::new(0usize));
    let counter = hits.clone();
    player.body.events.set_on_collide(move |side| {
        counter.set(counter.get() + 1);
        println!("  collide side=({}, {})", side.x, side.y);
    });

    player.body.velocity.delta_x = 0.35;
    player.body.velocity.delta_y = -0.2;

    for tick in 0..60 {
        player.update();
        let p = player.body.position;
        if tick % 5 == 0 {
            println!(
                "tick {:>2}: cell=({}, {}) ratio=({:.2}, {:.2}) px=({}, {}) \
                 mid=({:.1}, {:.1}) ground={}",
                tick,
                p.grid_x,
                p.grid_y,
                p.grid_cell_ratio_x,
                p.grid_cell_ratio_y,
                p.x,
                p.y,
                p.interpolate(0.5).x,
                p.interpolate(0.5).y,
                player.body.on_ground()
            );
        }
    }
    println!("collisions: {}", hits.get());
}
