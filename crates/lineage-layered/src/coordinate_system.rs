//! Rank-direction transforms.
//!
//! The pipeline always lays out top-to-bottom. For left-to-right / right-to-left drawings the
//! node boxes are rotated before ranking and the coordinates are swapped back afterwards;
//! bottom-to-top / right-to-left flip the rank axis.

use crate::RankDir;
use crate::graph::Graph;

pub fn adjust(g: &mut Graph) {
    match g.graph().rankdir {
        RankDir::LR | RankDir::RL => swap_width_height(g),
        RankDir::TB | RankDir::BT => {}
    }
}

pub fn undo(g: &mut Graph) {
    match g.graph().rankdir {
        RankDir::BT | RankDir::RL => reverse_y(g),
        RankDir::TB | RankDir::LR => {}
    }

    match g.graph().rankdir {
        RankDir::LR | RankDir::RL => {
            swap_xy(g);
            swap_width_height(g);
        }
        RankDir::TB | RankDir::BT => {}
    }
}

fn swap_width_height(g: &mut Graph) {
    g.for_each_node_mut(|_, n| {
        (n.width, n.height) = (n.height, n.width);
    });
}

fn reverse_y(g: &mut Graph) {
    g.for_each_node_mut(|_, n| {
        n.y = n.y.map(|y| -y);
    });
    g.for_each_edge_mut(|e| {
        for p in &mut e.label.points {
            p.y = -p.y;
        }
    });
}

fn swap_xy(g: &mut Graph) {
    g.for_each_node_mut(|_, n| {
        if let (Some(x), Some(y)) = (n.x, n.y) {
            n.x = Some(y);
            n.y = Some(x);
        }
    });
    g.for_each_edge_mut(|e| {
        for p in &mut e.label.points {
            (p.x, p.y) = (p.y, p.x);
        }
    });
}
