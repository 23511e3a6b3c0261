mod controls;
