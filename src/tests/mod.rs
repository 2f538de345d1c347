
mod frame_test;
mod planning_test;
